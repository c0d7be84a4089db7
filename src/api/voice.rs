use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use super::{ApiError, ApiResult, AppState};
use crate::providers::deepgram::DEFAULT_TTS_MODEL;
use crate::providers::traits::Transcript;

/// What browser recorders produce.
const DEFAULT_AUDIO_TYPE: &str = "audio/webm";

#[derive(Debug, Deserialize, Validate)]
pub struct TtsRequest {
    #[validate(length(max = 2000))]
    pub text: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub model: Option<String>,
}

pub async fn text_to_speech(
    State(state): State<AppState>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    request.validate()?;

    let text = request
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::DataContract("No text provided".to_string()))?;
    let model = request.model.as_deref().unwrap_or(DEFAULT_TTS_MODEL);

    let audio = state.speech()?.speak(text, model).await?;
    log::info!("Synthesized {} bytes of speech with {}", audio.len(), model);

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "public, max-age=31536000"),
        ],
        audio,
    )
        .into_response())
}

pub async fn speech_to_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Transcript>> {
    if body.is_empty() {
        return Err(ApiError::DataContract("No audio data provided".to_string()));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_AUDIO_TYPE)
        .to_string();

    let transcript = state.speech()?.transcribe(body.to_vec(), &content_type).await?;
    Ok(Json(transcript))
}
