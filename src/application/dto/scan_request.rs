// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::CrawlMode;
use serde::Deserialize;
use validator::Validate;

/// URL列表输入：JSON数组或按行分隔的字符串
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum UrlListInput {
    List(Vec<String>),
    Text(String),
}

impl UrlListInput {
    /// 展开为去掉空白和空行后的URL字符串
    pub fn into_lines(self) -> Vec<String> {
        let raw = match self {
            UrlListInput::List(items) => items,
            UrlListInput::Text(text) => text.lines().map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

impl Default for UrlListInput {
    fn default() -> Self {
        UrlListInput::List(Vec::new())
    }
}

/// 多资源扫描请求
///
/// 限制字段缺省时使用配置中的默认值，超出硬上限时截断
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MultiscanRequestDto {
    #[serde(default)]
    pub mode: CrawlMode,
    #[serde(alias = "siteUrl")]
    pub site_url: Option<String>,
    pub urls: Option<UrlListInput>,
    /// OCR 提供商：openai / google / ocrspace
    pub provider: Option<String>,
    pub model: Option<String>,
    /// 提供商凭证；缺省时使用 `ocr.api_key`
    #[serde(alias = "token", alias = "apiKey")]
    pub api_key: Option<String>,
    #[serde(alias = "includeExternal")]
    pub include_external: Option<bool>,
    #[serde(alias = "maxUrls")]
    #[validate(range(min = 1))]
    pub max_urls: Option<usize>,
    #[serde(alias = "maxPages")]
    #[validate(range(min = 1))]
    pub max_pages: Option<usize>,
    #[serde(alias = "maxResources")]
    pub max_resources: Option<usize>,
    #[serde(alias = "maxTextChars")]
    #[validate(range(min = 1))]
    pub max_text_chars: Option<usize>,
    #[serde(alias = "delayMs")]
    #[validate(range(max = 60000))]
    pub delay_ms: Option<u64>,
    #[serde(alias = "timeoutSec")]
    #[validate(range(min = 1, max = 120))]
    pub timeout_sec: Option<u64>,
}

/// 文本检查请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckTextRequestDto {
    #[validate(length(min = 1, message = "text cannot be empty"))]
    pub text: String,
}

/// 单个URL检查请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckUrlRequestDto {
    #[validate(url)]
    pub url: String,
}

/// 批量URL检查请求
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCheckRequestDto {
    #[serde(default)]
    pub urls: UrlListInput,
}

/// 文本详细分析请求
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeTextRequestDto {
    #[validate(length(min = 1, message = "text cannot be empty"))]
    pub text: String,
}

/// 两段文本对比请求，缺省字段视为空文本
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareTextsRequestDto {
    #[serde(default)]
    pub text1: String,
    #[serde(default)]
    pub text2: String,
}

/// 替换建议请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestFixesRequestDto {
    #[serde(default)]
    pub words: Vec<String>,
}
