use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::database::Database;
use crate::providers::traits::{CompletionProvider, SpeechProvider};
use crate::providers::{DeepgramClient, GeminiProvider};

pub mod coach;
pub mod error;
pub mod logs;
pub mod menu;
pub mod profile;
pub mod tools;
pub mod voice;

pub use error::{ApiError, ApiResult};

#[derive(Clone)]
pub struct AppState {
    pub llm: Option<Arc<dyn CompletionProvider>>,
    pub speech: Option<Arc<dyn SpeechProvider>>,
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Builds vendor clients for whichever keys are configured.
    pub fn new(config: AppConfig, db: Database) -> Self {
        let llm = config.gemini_api_key.clone().map(|key| {
            Arc::new(GeminiProvider::new(&config.gemini, key)) as Arc<dyn CompletionProvider>
        });
        let speech = config.deepgram_api_key.clone().map(|key| {
            Arc::new(DeepgramClient::new(&config.deepgram, key)) as Arc<dyn SpeechProvider>
        });

        Self {
            llm,
            speech,
            db,
            config: Arc::new(config),
        }
    }

    pub(crate) fn llm(&self) -> ApiResult<&dyn CompletionProvider> {
        self.llm
            .as_deref()
            .ok_or_else(|| ApiError::Config("Gemini API key not configured".to_string()))
    }

    pub(crate) fn speech(&self) -> ApiResult<&dyn SpeechProvider> {
        self.speech
            .as_deref()
            .ok_or_else(|| ApiError::Config("Deepgram API key not configured".to_string()))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    message: &'static str,
}

/// Create and configure the API router
pub fn create_api(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    let max_concurrent = state.config.max_concurrent_requests.max(1);

    // Fully permissive CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/api", get(health_check))
        .route("/api/", get(health_check))
        .route("/api/menu/scan", post(menu::scan_menu))
        .route("/api/menu/analyze", post(menu::analyze_menu))
        .route("/api/menu/recommend", post(menu::recommend))
        .route("/api/coach/ask", post(coach::ask))
        .route("/api/tools/tdee", post(tools::tdee))
        .route("/api/tts", post(voice::text_to_speech))
        .route("/api/stt", post(voice::speech_to_text))
        .route("/api/me", get(profile::get_me))
        .route("/api/me/profile", put(profile::update_profile))
        .route("/api/logs", post(logs::add_log).get(logs::day_logs))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent))
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    log::debug!("Health check requested");
    Json(HealthResponse {
        message: "Fitbear AI API is running!",
    })
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::providers::traits::{ImageInput, SpeechError, Transcript};

    /// Completion stub that records prompts and answers with a fixed reply.
    pub struct StubLlm {
        pub reply: Result<String, String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubLlm {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn answer(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(anyhow::Error::msg)
        }
    }

    #[async_trait]
    impl CompletionProvider for StubLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.answer(prompt)
        }

        async fn complete_with_image(&self, prompt: &str, _image: ImageInput<'_>) -> Result<String> {
            self.answer(prompt)
        }

        fn model_name(&self) -> &str {
            "stub"
        }
    }

    pub enum StubSpeech {
        Ok,
        Silent,
        Rejected(u16),
        /// Transcribes to the content type it was handed.
        EchoContentType,
    }

    #[async_trait]
    impl SpeechProvider for StubSpeech {
        async fn speak(&self, text: &str, model: &str) -> Result<Vec<u8>, SpeechError> {
            match self {
                StubSpeech::Rejected(status) => Err(SpeechError::Status {
                    service: "TTS",
                    status: *status,
                    body: "rejected".to_string(),
                }),
                _ => Ok(format!("{}|{}", model, text).into_bytes()),
            }
        }

        async fn transcribe(&self, audio: Vec<u8>, content_type: &str) -> Result<Transcript, SpeechError> {
            match self {
                StubSpeech::EchoContentType => Ok(Transcript {
                    transcript: content_type.to_string(),
                    confidence: 1.0,
                }),
                StubSpeech::Ok => Ok(Transcript {
                    transcript: String::from_utf8_lossy(&audio).to_string(),
                    confidence: 0.93,
                }),
                StubSpeech::Silent => Err(SpeechError::NoSpeech),
                StubSpeech::Rejected(status) => Err(SpeechError::Status {
                    service: "STT",
                    status: *status,
                    body: "rejected".to_string(),
                }),
            }
        }
    }

    pub async fn state(
        llm: Option<Arc<dyn CompletionProvider>>,
        speech: Option<Arc<dyn SpeechProvider>>,
    ) -> AppState {
        AppState {
            llm,
            speech,
            db: Database::in_memory().await.unwrap(),
            config: Arc::new(AppConfig::default()),
        }
    }

    pub async fn send(state: AppState, request: Request<Body>) -> Response {
        create_api(state).oneshot(request).await.unwrap()
    }

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    pub async fn expect_error(response: Response, status: StatusCode, kind: &str) -> String {
        assert_eq!(response.status(), status);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], kind);
        body["error"]["message"].as_str().unwrap().to_string()
    }
}
