// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 文本编码处理模块
//!
//! 将抓取到的网页字节解码为UTF-8文本。编码来源依次为：
//! - HTTP Content-Type 头中的 charset
//! - HTML meta 标签声明
//! - chardetng 自动检测（常见于 windows-1251 站点）

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static CHARSET_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"';\s]+)"#).expect("valid charset regex"));

static META_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*charset\s*=\s*["']?([^"'>\s/]+)"#).expect("valid meta regex")
});

/// meta 声明只在文档开头查找
const META_SNIFF_BYTES: usize = 2048;

/// 从 Content-Type 中提取 charset 参数
fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let label = CHARSET_PARAM.captures(content_type)?.get(1)?.as_str();
    Encoding::for_label(label.as_bytes())
}

/// 从 HTML meta 标签中提取编码声明
fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head);
    let label = META_CHARSET.captures(&head)?.get(1)?.as_str().to_string();
    Encoding::for_label(label.as_bytes())
}

/// 检测字节序列的编码
pub fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some(encoding) = content_type.and_then(charset_from_content_type) {
        return encoding;
    }
    if let Some(encoding) = charset_from_meta(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// 将网页字节解码为字符串
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(bytes, content_type);
    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("解码时出现无效字节，编码: {}", used.name());
    }
    decoded.into_owned()
}

/// 判断解码结果是否像二进制数据
pub fn looks_binary(text: &str) -> bool {
    text.contains('\0')
}
