// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::FetchError;
use std::net::IpAddr;
use tokio::net::lookup_host;
use url::Url;

/// 验证 URL 是否安全 (防止 SSRF)
///
/// 检查解析后的 IP 是否为私有地址或环回地址
pub async fn validate_url(url: &Url) -> Result<(), FetchError> {
    let host = url
        .host_str()
        .ok_or_else(|| FetchError::InvalidUrl(format!("missing host: {}", url)))?;

    if host.eq_ignore_ascii_case("localhost") {
        return Err(FetchError::Blocked("localhost is not allowed".to_string()));
    }

    // lookup_host 需要 host:port；IPv6 字面量带方括号
    let port = url.port_or_known_default().unwrap_or(80);
    let addr_str = format!("{}:{}", host, port);

    let addrs = lookup_host(addr_str)
        .await
        .map_err(|e| FetchError::Connect(format!("DNS lookup failed for {}: {}", host, e)))?;

    // 检查所有解析出的 IP
    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(FetchError::Blocked(format!(
                "private IP access is not allowed: {}",
                addr.ip()
            )));
        }
    }

    Ok(())
}

fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            // 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
            ipv4.is_private()
                || ipv4.is_loopback()
                || ipv4.is_link_local()
                || ipv4.is_unspecified()
                // 224.0.0.0/4 (Multicast)
                || (224..=239).contains(&octets[0])
        }
        IpAddr::V6(ipv6) => {
            let segments = ipv6.segments();
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // fc00::/7 (Unique local)
                || (segments[0] & 0xfe00) == 0xfc00
                // fe80::/10 (Link-local)
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}
