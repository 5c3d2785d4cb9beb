// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::ocr::{extract_usage, OcrEngine, OcrInput, OcrProvider, OcrRequest};
use crate::utils::errors::ResourceError;
use std::sync::Arc;
use tracing::debug;

/// 图片文本提取器
///
/// 完全委托给 OCR 引擎；空白结果视为该资源的最终失败，不重试
#[derive(Clone)]
pub struct ImageExtractor {
    engine: Arc<dyn OcrEngine>,
    model: Option<String>,
    api_key: String,
}

impl ImageExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>, model: Option<String>, api_key: String) -> Self {
        Self {
            engine,
            model,
            api_key,
        }
    }

    pub fn provider(&self) -> OcrProvider {
        self.engine.provider()
    }

    /// 识别图片文字
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 非空的识别文本
    /// * `Err(ResourceError::OcrEmptyResult)` - 识别结果为空
    /// * `Err(ResourceError::OcrProviderError)` - 提供商调用失败
    pub async fn extract(&self, input: OcrInput) -> Result<String, ResourceError> {
        let request = OcrRequest {
            input,
            model: self.model.clone(),
            api_key: self.api_key.clone(),
        };

        let output = self.engine.recognize(&request).await?;
        if output.text.trim().is_empty() {
            return Err(ResourceError::OcrEmptyResult);
        }

        let provider = self.engine.provider();
        debug!(
            provider = %provider,
            chars = output.text.chars().count(),
            usage = %extract_usage(provider, &output.raw),
            "OCR completed"
        );
        Ok(output.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::ocr::{OcrError, OcrOutput};
    use async_trait::async_trait;
    use serde_json::json;

    struct StubOcr {
        text: &'static str,
    }

    #[async_trait]
    impl OcrEngine for StubOcr {
        async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError> {
            if request.api_key.is_empty() {
                return Err(OcrError::MissingCredential);
            }
            Ok(OcrOutput {
                text: self.text.to_string(),
                raw: json!({}),
            })
        }

        fn provider(&self) -> OcrProvider {
            OcrProvider::OcrSpace
        }
    }

    fn input() -> OcrInput {
        OcrInput::Url("https://example.com/banner.png".to_string())
    }

    #[tokio::test]
    async fn test_returns_recognized_text() {
        let extractor =
            ImageExtractor::new(Arc::new(StubOcr { text: "Распродажа" }), None, "k".into());

        assert_eq!(extractor.extract(input()).await.unwrap(), "Распродажа");
        assert_eq!(extractor.provider(), OcrProvider::OcrSpace);
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_result() {
        let extractor = ImageExtractor::new(Arc::new(StubOcr { text: " \n " }), None, "k".into());

        let err = extractor.extract(input()).await.unwrap_err();
        assert!(matches!(err, ResourceError::OcrEmptyResult));
    }

    #[tokio::test]
    async fn test_provider_failure_is_mapped() {
        let extractor = ImageExtractor::new(Arc::new(StubOcr { text: "x" }), None, String::new());

        let err = extractor.extract(input()).await.unwrap_err();
        assert_eq!(err.code(), "ocr_provider_error");
    }
}
