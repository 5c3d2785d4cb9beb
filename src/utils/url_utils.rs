// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 规范化HTTP/HTTPS URL
///
/// 去除首尾空白和片段标识符；非 http(s) 或无法解析的输入返回 `None`
pub fn normalize_http_url(raw: &str) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut url = Url::parse(trimmed).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.host_str()?;
    url.set_fragment(None);
    Some(url)
}

/// 解析页面中的链接目标
///
/// 跳过片段、mailto、javascript、tel 和 data 链接，只保留 http(s) 结果
pub fn resolve_link(base_url: &Url, target: &str) -> Option<Url> {
    let target = target.trim();
    if target.is_empty()
        || target.starts_with('#')
        || target.starts_with("mailto:")
        || target.starts_with("javascript:")
        || target.starts_with("tel:")
        || target.starts_with("data:")
    {
        return None;
    }

    let mut url = resolve_url(base_url, target).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    // Remove fragment to improve deduplication
    url.set_fragment(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_url() {
        let base = Url::parse("http://example.com/a/b").unwrap();
        let path = "http://t.co/c";
        assert_eq!(resolve_url(&base, path).unwrap().as_str(), "http://t.co/c");
    }

    #[test]
    fn test_resolve_protocol_relative_url() {
        let base = Url::parse("https://example.com/a/b").unwrap();
        let path = "//t.co/c";
        assert_eq!(resolve_url(&base, path).unwrap().as_str(), "https://t.co/c");
    }

    #[test]
    fn test_resolve_relative_url() {
        let base = Url::parse("http://example.com/a/b").unwrap();
        let path = "c";
        assert_eq!(
            resolve_url(&base, path).unwrap().as_str(),
            "http://example.com/a/c"
        );
    }

    #[test]
    fn test_normalize_strips_fragment_and_whitespace() {
        let url = normalize_http_url("  https://example.com/page?x=1#top ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page?x=1");
    }

    #[test]
    fn test_normalize_rejects_non_http() {
        assert!(normalize_http_url("ftp://example.com/file").is_none());
        assert!(normalize_http_url("example.com").is_none());
        assert!(normalize_http_url("   ").is_none());
    }

    #[test]
    fn test_resolve_link_skips_special_schemes() {
        let base = Url::parse("https://example.com/docs/").unwrap();
        assert!(resolve_link(&base, "#section").is_none());
        assert!(resolve_link(&base, "mailto:a@example.com").is_none());
        assert!(resolve_link(&base, "javascript:void(0)").is_none());
        assert!(resolve_link(&base, "tel:+7123").is_none());
        assert_eq!(
            resolve_link(&base, "guide.html#intro").unwrap().as_str(),
            "https://example.com/docs/guide.html"
        );
    }
}
