// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! OCR 提供商
//!
//! 每个提供商实现同一个 [`OcrEngine`] 特质，由 [`OcrRouter`] 按 [`OcrProvider`] 选择

pub mod google_vision;
pub mod ocr_space;
pub mod openai;

use crate::config::settings::OcrSettings;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use google_vision::GoogleVisionEngine;
pub use ocr_space::OcrSpaceEngine;
pub use openai::OpenAiEngine;

/// OCR 错误类型
#[derive(Error, Debug)]
pub enum OcrError {
    /// 识别结果为空
    #[error("OCR returned empty text")]
    EmptyResult,
    /// 提供商返回错误
    #[error("OCR provider error: {0}")]
    Provider(String),
    /// 缺少提供商凭证
    #[error("OCR credential is missing")]
    MissingCredential,
    /// 输入无效
    #[error("Invalid OCR input: {0}")]
    InvalidInput(String),
    /// HTTP 请求失败
    #[error("OCR request failed: {0}")]
    Http(String),
}

impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => OcrError::Provider(format!("HTTP {}", status.as_u16())),
            None => OcrError::Http(err.to_string()),
        }
    }
}

/// OCR 提供商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrProvider {
    /// OpenAI Responses API
    OpenAi,
    /// Google Vision
    Google,
    /// OCR.Space
    OcrSpace,
}

impl OcrProvider {
    pub const ALL: [OcrProvider; 3] = [OcrProvider::OpenAi, OcrProvider::Google, OcrProvider::OcrSpace];

    pub fn as_str(&self) -> &'static str {
        match self {
            OcrProvider::OpenAi => "openai",
            OcrProvider::Google => "google",
            OcrProvider::OcrSpace => "ocrspace",
        }
    }
}

impl fmt::Display for OcrProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OcrProvider {
    type Err = OcrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(OcrProvider::OpenAi),
            "google" => Ok(OcrProvider::Google),
            "ocrspace" => Ok(OcrProvider::OcrSpace),
            other => Err(OcrError::InvalidInput(format!("unknown OCR provider: {}", other))),
        }
    }
}

/// 待识别的图片
#[derive(Debug, Clone)]
pub enum OcrInput {
    /// 公开可访问的图片URL
    Url(String),
    /// 已下载的图片字节
    Bytes { data: Bytes, mime: String },
}

impl OcrInput {
    /// 以 data URL 形式表示图片（URL 输入原样返回）
    pub fn as_image_ref(&self) -> String {
        match self {
            OcrInput::Url(url) => url.clone(),
            OcrInput::Bytes { data, mime } => {
                format!("data:{};base64,{}", mime, STANDARD.encode(data))
            }
        }
    }
}

/// 单次识别请求
#[derive(Debug, Clone)]
pub struct OcrRequest {
    pub input: OcrInput,
    /// 模型 / 特性 / 语言，含义由提供商决定
    pub model: Option<String>,
    pub api_key: String,
}

/// 识别结果
#[derive(Debug, Clone)]
pub struct OcrOutput {
    pub text: String,
    /// 提供商原始响应
    pub raw: Value,
}

impl OcrOutput {
    /// 空白结果视为识别失败
    pub(crate) fn non_empty(text: String, raw: Value) -> Result<Self, OcrError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(OcrError::EmptyResult);
        }
        Ok(Self { text, raw })
    }
}

/// OCR 引擎特质
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// 识别图片中的文字
    ///
    /// 结果为空时返回 [`OcrError::EmptyResult`]
    async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError>;

    /// 提供商标识
    fn provider(&self) -> OcrProvider;
}

/// OCR 路由器
///
/// 持有全部已配置的提供商实现，按请求中的提供商选择
#[derive(Clone, Default)]
pub struct OcrRouter {
    engines: HashMap<OcrProvider, Arc<dyn OcrEngine>>,
}

impl OcrRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 根据配置创建三个提供商实现，共享一个HTTP客户端
    pub fn from_settings(settings: &OcrSettings) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_sec))
            .build()?;

        Ok(Self::new()
            .register(Arc::new(OpenAiEngine::new(
                client.clone(),
                &settings.openai_base_url,
            )))
            .register(Arc::new(GoogleVisionEngine::new(
                client.clone(),
                &settings.google_base_url,
            )))
            .register(Arc::new(OcrSpaceEngine::new(
                client,
                &settings.ocrspace_base_url,
            ))))
    }

    /// 注册提供商实现，同一提供商后注册的覆盖先注册的
    pub fn register(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.engines.insert(engine.provider(), engine);
        self
    }

    pub fn get(&self, provider: OcrProvider) -> Option<Arc<dyn OcrEngine>> {
        self.engines.get(&provider).cloned()
    }
}

/// 从提供商原始响应中提取用量统计
pub fn extract_usage(provider: OcrProvider, raw: &Value) -> Value {
    if !raw.is_object() {
        return json!({});
    }

    match provider {
        OcrProvider::OpenAi => {
            let usage = &raw["usage"];
            json!({
                "input_tokens": usage.get("input_tokens").cloned().unwrap_or(Value::Null),
                "output_tokens": usage.get("output_tokens").cloned().unwrap_or(Value::Null),
                "total_tokens": usage.get("total_tokens").cloned().unwrap_or(Value::Null),
            })
        }
        OcrProvider::Google => {
            let first = &raw["responses"][0];
            let pages = first["fullTextAnnotation"]["pages"]
                .as_array()
                .map_or(0, Vec::len);
            let annotations = first["textAnnotations"].as_array().map_or(0, Vec::len);
            json!({
                "pages_detected": pages,
                "text_annotations": annotations,
            })
        }
        OcrProvider::OcrSpace => {
            let parsed = raw["ParsedResults"].as_array();
            // 该字段有时是字符串
            let processing_ms = parsed
                .and_then(|items| items.first())
                .map(|item| &item["ProcessingTimeInMilliseconds"])
                .and_then(|v| {
                    v.as_f64()
                        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
                })
                .map(|ms| ms as i64);
            json!({
                "parsed_results": parsed.map_or(0, Vec::len),
                "processing_ms": processing_ms,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("OpenAI".parse::<OcrProvider>().unwrap(), OcrProvider::OpenAi);
        assert_eq!(" google ".parse::<OcrProvider>().unwrap(), OcrProvider::Google);
        assert_eq!("ocrspace".parse::<OcrProvider>().unwrap(), OcrProvider::OcrSpace);
        assert!("tesseract".parse::<OcrProvider>().is_err());
        assert_eq!(OcrProvider::OcrSpace.to_string(), "ocrspace");
    }

    #[test]
    fn test_bytes_input_becomes_data_url() {
        let input = OcrInput::Bytes {
            data: Bytes::from_static(b"abc"),
            mime: "image/png".to_string(),
        };
        assert_eq!(input.as_image_ref(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_whitespace_output_is_empty_result() {
        let err = OcrOutput::non_empty("  \n\t".to_string(), json!({})).unwrap_err();
        assert!(matches!(err, OcrError::EmptyResult));
    }

    #[test]
    fn test_usage_extraction() {
        let openai = json!({"usage": {"input_tokens": 10, "output_tokens": 4, "total_tokens": 14}});
        assert_eq!(extract_usage(OcrProvider::OpenAi, &openai)["total_tokens"], 14);

        let google = json!({"responses": [{
            "fullTextAnnotation": {"pages": [{}, {}]},
            "textAnnotations": [{}, {}, {}]
        }]});
        let usage = extract_usage(OcrProvider::Google, &google);
        assert_eq!(usage["pages_detected"], 2);
        assert_eq!(usage["text_annotations"], 3);

        let ocrspace = json!({"ParsedResults": [{"ProcessingTimeInMilliseconds": "125.7"}]});
        let usage = extract_usage(OcrProvider::OcrSpace, &ocrspace);
        assert_eq!(usage["parsed_results"], 1);
        assert_eq!(usage["processing_ms"], 125);

        assert_eq!(extract_usage(OcrProvider::OpenAi, &json!("oops")), json!({}));
    }

    #[test]
    fn test_router_lookup() {
        let settings = OcrSettings::default();
        let router = OcrRouter::from_settings(&settings).unwrap();
        for provider in OcrProvider::ALL {
            assert_eq!(router.get(provider).unwrap().provider(), provider);
        }
        assert!(OcrRouter::new().get(OcrProvider::Google).is_none());
    }
}
