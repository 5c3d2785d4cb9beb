// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{OcrEngine, OcrError, OcrInput, OcrOutput, OcrProvider, OcrRequest};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

const DEFAULT_LANGUAGE: &str = "rus";

/// OCR.Space 识别引擎
///
/// `model` 字段用作识别语言
pub struct OcrSpaceEngine {
    client: reqwest::Client,
    base_url: String,
}

impl OcrSpaceEngine {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn extract_text(response: &Value) -> String {
    response["ParsedResults"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item["ParsedText"].as_str())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn processing_error(response: &Value) -> Option<String> {
    if !response["IsErroredOnProcessing"].as_bool().unwrap_or(false) {
        return None;
    }

    // ErrorMessage 可能是字符串或字符串数组
    let message = match &response["ErrorMessage"] {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    };

    Some(if message.is_empty() {
        "OCR.Space error".to_string()
    } else {
        message
    })
}

#[async_trait]
impl OcrEngine for OcrSpaceEngine {
    async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError> {
        if request.api_key.trim().is_empty() {
            return Err(OcrError::MissingCredential);
        }

        let language = request.model.as_deref().unwrap_or(DEFAULT_LANGUAGE);
        let mut form = Form::new()
            .text("language", language.to_string())
            .text("isOverlayRequired", "false")
            .text("OCREngine", "2");

        form = match &request.input {
            OcrInput::Url(url) => form.text("url", url.clone()),
            OcrInput::Bytes { data, mime } => {
                let part = Part::bytes(data.to_vec())
                    .file_name("image.png")
                    .mime_str(mime)
                    .map_err(|e| OcrError::InvalidInput(e.to_string()))?;
                form.part("file", part)
            }
        };

        let response = self
            .client
            .post(format!("{}/parse/image", self.base_url))
            .header("apikey", &request.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let raw: Value = response.json().await?;
        if let Some(message) = processing_error(&raw) {
            return Err(OcrError::Provider(message));
        }

        OcrOutput::non_empty(extract_text(&raw), raw)
    }

    fn provider(&self) -> OcrProvider {
        OcrProvider::OcrSpace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url_request() -> OcrRequest {
        OcrRequest {
            input: OcrInput::Url("https://example.com/poster.jpg".to_string()),
            model: None,
            api_key: "space-key".to_string(),
        }
    }

    #[test]
    fn test_error_message_shapes() {
        let list = json!({"IsErroredOnProcessing": true, "ErrorMessage": ["E1", "E2"]});
        assert_eq!(processing_error(&list).unwrap(), "E1; E2");

        let single = json!({"IsErroredOnProcessing": true, "ErrorMessage": "Timed out"});
        assert_eq!(processing_error(&single).unwrap(), "Timed out");

        assert!(processing_error(&json!({"IsErroredOnProcessing": false})).is_none());
    }

    #[tokio::test]
    async fn test_recognize_joins_parsed_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse/image"))
            .and(header("apikey", "space-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "IsErroredOnProcessing": false,
                "ParsedResults": [
                    {"ParsedText": "Акция", "ProcessingTimeInMilliseconds": "90"},
                    {"ParsedText": ""},
                    {"ParsedText": "Скидка"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let engine = OcrSpaceEngine::new(reqwest::Client::new(), &server.uri());
        let output = engine.recognize(&url_request()).await.unwrap();

        assert_eq!(output.text, "Акция\nСкидка");
    }

    #[tokio::test]
    async fn test_processing_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/parse/image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "IsErroredOnProcessing": true,
                "ErrorMessage": ["Unable to recognize the file type"]
            })))
            .mount(&server)
            .await;

        let engine = OcrSpaceEngine::new(reqwest::Client::new(), &server.uri());
        let err = engine.recognize(&url_request()).await.unwrap_err();

        assert!(matches!(err, OcrError::Provider(msg) if msg.contains("file type")));
    }
}
