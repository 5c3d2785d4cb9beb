// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{FetchError, FetchedResource, ResourceFetcher};
use crate::engines::validators;
use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// 手动跟随重定向的最大次数
const MAX_REDIRECTS: usize = 5;

/// 资源获取引擎
///
/// 基于reqwest实现的流式HTTP获取器，整个爬取任务共享一个客户端。
/// 客户端不自动跟随重定向，每一跳都重新经过私有地址检查。
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    block_private_hosts: bool,
    trusted_hosts: Vec<String>,
}

impl ReqwestFetcher {
    /// 创建新的获取器
    ///
    /// # 参数
    ///
    /// * `user_agent` - 请求使用的 User-Agent
    /// * `block_private_hosts` - 是否拒绝解析到私有地址的URL
    pub fn new(user_agent: &str, block_private_hosts: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .redirect(Policy::none())
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            client,
            block_private_hosts,
            trusted_hosts: Vec::new(),
        })
    }

    /// 设置不受私有地址拦截的主机
    pub fn with_trusted_hosts(mut self, hosts: Vec<String>) -> Self {
        self.trusted_hosts = hosts;
        self
    }

    /// SSRF 防护：初始URL和每个重定向目标都要检查
    async fn guard(&self, url: &Url) -> Result<(), FetchError> {
        if !self.block_private_hosts {
            return Ok(());
        }
        let trusted = url.host_str().is_some_and(|host| {
            self.trusted_hosts
                .iter()
                .any(|t| t.eq_ignore_ascii_case(host))
        });
        if trusted {
            return Ok(());
        }
        validators::validate_url(url).await
    }

    /// 发送请求并手动跟随重定向
    ///
    /// # 返回值
    ///
    /// 最终的非重定向响应及其URL
    async fn send_following_redirects(
        &self,
        url: Url,
        timeout: Duration,
    ) -> Result<(reqwest::Response, Url), FetchError> {
        let mut current = url;
        let mut hops = 0usize;

        loop {
            self.guard(&current).await?;

            let response = self
                .client
                .get(current.clone())
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(e, timeout))?;

            if !matches!(response.status().as_u16(), 301 | 302 | 303 | 307 | 308) {
                return Ok((response, current));
            }

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    FetchError::Request(format!("redirect without Location from {}", current))
                })?;
            let next = current
                .join(location)
                .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", location, e)))?;
            if next.scheme() != "http" && next.scheme() != "https" {
                return Err(FetchError::InvalidUrl(format!("redirect to {}", next)));
            }

            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(FetchError::Request(format!(
                    "too many redirects (more than {})",
                    MAX_REDIRECTS
                )));
            }
            debug!(from = %current, to = %next, hops, "Following redirect");
            current = next;
        }
    }
}

#[async_trait]
impl ResourceFetcher for ReqwestFetcher {
    /// 执行HTTP获取
    ///
    /// # 参数
    ///
    /// * `url` - 目标URL
    /// * `timeout` - 整个请求（含响应体）的超时
    /// * `max_bytes` - 响应体字节上限
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedResource)` - 获取到的资源
    /// * `Err(FetchError)` - 超时、连接失败、非2xx状态或超出上限
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        max_bytes: u64,
    ) -> Result<FetchedResource, FetchError> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        let start = Instant::now();
        let (mut response, final_url) = self.send_following_redirects(parsed, timeout).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        // Reject early when the declared size is already over the cap
        if let Some(declared) = response.content_length() {
            if declared > max_bytes {
                debug!(url = %url, declared, max_bytes, "declared size exceeds limit");
                return Err(FetchError::ResourceTooLarge { limit: max_bytes });
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToOwned::to_owned);

        let mut body = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?
        {
            if (body.len() + chunk.len()) as u64 > max_bytes {
                debug!(url = %url, max_bytes, "streamed body exceeds limit");
                return Err(FetchError::ResourceTooLarge { limit: max_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchedResource {
            url: final_url.to_string(),
            status_code: status.as_u16(),
            content_type,
            body: body.freeze(),
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
