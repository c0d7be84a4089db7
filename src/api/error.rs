use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::providers::traits::SpeechError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    DataContract(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Config(String),
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
    #[error("{0}")]
    Logic(String),
}

impl ApiError {
    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    /// Keeps the 413 axum reports for bodies over the upload limit.
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::DataContract(message)
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::DataContract(_) => "DataContract",
            ApiError::PayloadTooLarge(_) => "PayloadTooLarge",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Config(_) => "Config",
            ApiError::Upstream { .. } => "Upstream",
            ApiError::Storage(_) => "Storage",
            ApiError::Logic(_) => "Logic",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::DataContract(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Config(_) | ApiError::Storage(_) | ApiError::Logic(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::DataContract(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::DataContract(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::DataContract(rejection.body_text())
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::NoSpeech => ApiError::DataContract("No speech detected".to_string()),
            SpeechError::Status { service, status, body } => {
                log::error!("{} vendor error {}: {}", service, status, body);
                ApiError::Upstream {
                    status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                    message: format!("{} service failed", service),
                }
            }
            SpeechError::Transport(e) => ApiError::upstream(format!("Speech service unreachable: {}", e)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{} error: {}", self.kind(), self);
        } else {
            log::debug!("{} error: {}", self.kind(), self);
        }

        let body = json!({
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_kind_mapping() {
        let cases = [
            (ApiError::DataContract("x".into()), StatusCode::BAD_REQUEST, "DataContract"),
            (ApiError::PayloadTooLarge("x".into()), StatusCode::PAYLOAD_TOO_LARGE, "PayloadTooLarge"),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND, "NotFound"),
            (ApiError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "Config"),
            (ApiError::upstream("x"), StatusCode::BAD_GATEWAY, "Upstream"),
            (ApiError::Logic("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "Logic"),
        ];
        for (err, status, kind) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn upstream_keeps_vendor_status() {
        let err = ApiError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "TTS service failed".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn speech_errors_map_to_envelope_types() {
        let silent = ApiError::from(SpeechError::NoSpeech);
        assert_eq!(silent.status(), StatusCode::BAD_REQUEST);
        assert_eq!(silent.to_string(), "No speech detected");

        let rejected = ApiError::from(SpeechError::Status {
            service: "STT",
            status: 401,
            body: "bad key".to_string(),
        });
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(rejected.kind(), "Upstream");
        assert_eq!(rejected.to_string(), "STT service failed");
    }
}
