// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{OcrEngine, OcrError, OcrOutput, OcrProvider, OcrRequest};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

const DEFAULT_MODEL: &str = "gpt-4.1-mini";

const OCR_PROMPT: &str = "Extract all text from this image and return plain raw OCR text only. \
Do not edit, normalize, translate, summarize, censor, or correct anything. \
Preserve original wording, casing, punctuation, numbers, and line breaks exactly as recognized.";

/// OpenAI Responses API 识别引擎
pub struct OpenAiEngine {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiEngine {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// 优先使用 `output_text`，否则拼接 `output[].content[]` 中的文本块
fn extract_text(response: &Value) -> String {
    if let Some(text) = response["output_text"].as_str() {
        if !text.trim().is_empty() {
            return text.trim().to_string();
        }
    }

    let chunks: Vec<&str> = response["output"]
        .as_array()
        .into_iter()
        .flatten()
        .flat_map(|item| item["content"].as_array().into_iter().flatten())
        .filter(|content| matches!(content["type"].as_str(), Some("output_text") | Some("text")))
        .filter_map(|content| content["text"].as_str())
        .filter(|text| !text.is_empty())
        .collect();

    chunks.join("\n").trim().to_string()
}

#[async_trait]
impl OcrEngine for OpenAiEngine {
    async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError> {
        if request.api_key.trim().is_empty() {
            return Err(OcrError::MissingCredential);
        }

        let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let payload = json!({
            "model": model,
            "input": [{
                "role": "user",
                "content": [
                    {"type": "input_text", "text": OCR_PROMPT},
                    {"type": "input_image", "image_url": request.input.as_image_ref()}
                ]
            }]
        });

        debug!(model, "Sending OpenAI OCR request");
        let response = self
            .client
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&request.api_key)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let raw: Value = response.json().await?;
        OcrOutput::non_empty(extract_text(&raw), raw)
    }

    fn provider(&self) -> OcrProvider {
        OcrProvider::OpenAi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::ocr::OcrInput;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(key: &str) -> OcrRequest {
        OcrRequest {
            input: OcrInput::Url("https://example.com/banner.png".to_string()),
            model: None,
            api_key: key.to_string(),
        }
    }

    #[test]
    fn test_extract_text_from_output_blocks() {
        let raw = json!({
            "output": [{
                "content": [
                    {"type": "output_text", "text": "Первая строка"},
                    {"type": "refusal", "text": "ignored"},
                    {"type": "text", "text": "Вторая строка"}
                ]
            }]
        });
        assert_eq!(extract_text(&raw), "Первая строка\nВторая строка");
    }

    #[tokio::test]
    async fn test_recognize_uses_output_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output_text": "  Скидки до 50%  ",
                "usage": {"input_tokens": 12, "output_tokens": 5, "total_tokens": 17}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let engine = OpenAiEngine::new(reqwest::Client::new(), &format!("{}/", server.uri()));
        let output = engine.recognize(&request("sk-test")).await.unwrap();

        assert_eq!(output.text, "Скидки до 50%");
        assert_eq!(output.raw["usage"]["total_tokens"], 17);
    }

    #[tokio::test]
    async fn test_empty_output_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": []})))
            .mount(&server)
            .await;

        let engine = OpenAiEngine::new(reqwest::Client::new(), &server.uri());
        let err = engine.recognize(&request("sk-test")).await.unwrap_err();

        assert!(matches!(err, OcrError::EmptyResult));
    }

    #[tokio::test]
    async fn test_provider_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let engine = OpenAiEngine::new(reqwest::Client::new(), &server.uri());
        let err = engine.recognize(&request("bad")).await.unwrap_err();

        assert!(matches!(err, OcrError::Provider(_)));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let engine = OpenAiEngine::new(reqwest::Client::new(), "http://127.0.0.1:9");
        let err = engine.recognize(&request(" ")).await.unwrap_err();
        assert!(matches!(err, OcrError::MissingCredential));
    }
}
