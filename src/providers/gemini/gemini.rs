use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::GeminiConfig;
use crate::providers::traits::{CompletionProvider, ImageInput};

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    model: String,
    api_url: String,
}

impl GeminiProvider {
    pub fn new(config: &GeminiConfig, api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
            model: config.model.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }

    async fn generate(&self, parts: Value) -> Result<String> {
        let response = self.client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": parts
                }]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("Gemini request failed: Status {}, Body: {}", status, error_text));
        }

        let response_json: Value = response.json().await?;
        extract_text(&response_json)
    }
}

/// Concatenates the text parts of the first candidate.
pub fn extract_text(response_json: &Value) -> Result<String> {
    if let Some(error) = response_json.get("error") {
        return Err(anyhow!("Gemini returned error: {}", error));
    }

    let parts = response_json
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .ok_or_else(|| anyhow!("Invalid response format: no candidate content"))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(anyhow!("Invalid response format: candidate has no text"));
    }
    Ok(text)
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate(json!([{ "text": prompt }])).await
    }

    async fn complete_with_image(&self, prompt: &str, image: ImageInput<'_>) -> Result<String> {
        log::debug!("Sending {} byte {} image to {}", image.data.len(), image.mime_type, self.model);

        let encoded = general_purpose::STANDARD.encode(image.data);
        self.generate(json!([
            { "text": prompt },
            {
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": encoded
                }
            }
        ]))
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
