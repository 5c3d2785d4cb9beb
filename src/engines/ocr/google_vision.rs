// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::{OcrEngine, OcrError, OcrInput, OcrOutput, OcrProvider, OcrRequest};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

const DEFAULT_FEATURE: &str = "DOCUMENT_TEXT_DETECTION";

/// Google Vision 识别引擎
///
/// `model` 字段用作 feature 类型
pub struct GoogleVisionEngine {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleVisionEngine {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn extract_text(response: &Value) -> String {
    let first = &response["responses"][0];
    first["fullTextAnnotation"]["text"]
        .as_str()
        .filter(|t| !t.is_empty())
        .or_else(|| first["textAnnotations"][0]["description"].as_str())
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[async_trait]
impl OcrEngine for GoogleVisionEngine {
    async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError> {
        if request.api_key.trim().is_empty() {
            return Err(OcrError::MissingCredential);
        }

        let image = match &request.input {
            OcrInput::Url(url) => json!({"source": {"imageUri": url}}),
            OcrInput::Bytes { data, .. } => json!({"content": STANDARD.encode(data)}),
        };
        let feature = request.model.as_deref().unwrap_or(DEFAULT_FEATURE);
        let payload = json!({
            "requests": [{
                "image": image,
                "features": [{"type": feature}]
            }]
        });

        let response = self
            .client
            .post(format!("{}/images:annotate", self.base_url))
            .query(&[("key", request.api_key.as_str())])
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let raw: Value = response.json().await?;
        if let Some(message) = raw["responses"][0]["error"]["message"].as_str() {
            return Err(OcrError::Provider(message.to_string()));
        }

        OcrOutput::non_empty(extract_text(&raw), raw)
    }

    fn provider(&self) -> OcrProvider {
        OcrProvider::Google
    }
}
