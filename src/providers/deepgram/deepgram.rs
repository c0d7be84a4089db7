use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::config::DeepgramConfig;
use crate::providers::traits::{SpeechError, SpeechProvider, Transcript};

pub const DEFAULT_TTS_MODEL: &str = "aura-2-hermes-en";

const STT_PARAMS: [(&str, &str); 4] = [
    ("smart_format", "true"),
    ("model", "nova-2-general"),
    ("punctuate", "true"),
    ("language", "en"),
];

#[derive(Clone)]
pub struct DeepgramClient {
    api_key: String,
    client: Client,
    api_url: String,
}

impl DeepgramClient {
    pub fn new(config: &DeepgramConfig, api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_key)
    }
}

/// Pulls the first alternative out of a Deepgram `listen` response.
pub fn parse_transcript(body: &Value) -> Result<Transcript, SpeechError> {
    let alternative = &body["results"]["channels"][0]["alternatives"][0];
    let transcript = alternative["transcript"].as_str().unwrap_or("").trim();

    if transcript.is_empty() {
        return Err(SpeechError::NoSpeech);
    }

    Ok(Transcript {
        transcript: transcript.to_string(),
        confidence: alternative["confidence"].as_f64().unwrap_or(0.0),
    })
}

#[async_trait]
impl SpeechProvider for DeepgramClient {
    async fn speak(&self, text: &str, model: &str) -> Result<Vec<u8>, SpeechError> {
        let response = self.client
            .post(format!("{}/speak", self.api_url))
            .query(&[("model", model)])
            .header("Authorization", self.auth_header())
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Deepgram TTS error: {}", body);
            return Err(SpeechError::Status {
                service: "TTS",
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<Transcript, SpeechError> {
        let response = self.client
            .post(format!("{}/listen", self.api_url))
            .query(&STT_PARAMS)
            .header("Authorization", self.auth_header())
            .header("Content-Type", content_type)
            .body(audio)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Deepgram STT error: {}", body);
            return Err(SpeechError::Status {
                service: "STT",
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        parse_transcript(&body)
    }
}
