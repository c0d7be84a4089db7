use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Image bytes handed to a vision-capable model.
#[derive(Debug, Clone, Copy)]
pub struct ImageInput<'a> {
    pub data: &'a [u8],
    pub mime_type: &'a str,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    async fn complete_with_image(&self, prompt: &str, image: ImageInput<'_>) -> Result<String>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub transcript: String,
    pub confidence: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("{service} service failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("No speech detected")]
    NoSpeech,
    #[error("Speech request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn speak(&self, text: &str, model: &str) -> Result<Vec<u8>, SpeechError>;

    async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<Transcript, SpeechError>;
}
