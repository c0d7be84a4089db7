use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use super::{ApiError, ApiResult, AppState};
use crate::coach::{ask_coach, CoachProfile, CoachReply};

#[derive(Debug, Deserialize, Validate)]
pub struct CoachRequest {
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    pub profile: Option<CoachProfile>,
    #[serde(default)]
    pub context_flags: Vec<String>,
    /// Looked up when no inline profile is sent.
    pub user_id: Option<String>,
}

pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<CoachRequest>, JsonRejection>,
) -> ApiResult<Json<CoachReply>> {
    let Json(request) = payload?;
    request.validate()?;

    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::DataContract("No message provided".to_string()))?;

    let profile = match (request.profile, request.user_id.as_deref()) {
        (Some(profile), _) => Some(profile),
        (None, Some(user_id)) => state.db.get_profile(user_id).await?.as_ref().map(CoachProfile::from),
        (None, None) => None,
    };

    let llm = state.llm()?;
    let reply = ask_coach(llm, message, profile.as_ref(), &request.context_flags)
        .await
        .map_err(|e| ApiError::upstream(format!("Failed to get response from Coach C: {}", e)))?;

    Ok(Json(reply))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::test_support::*;
    use crate::database::ProfileUpdate;
    use crate::food::tdee::ActivityLevel;
    use crate::providers::traits::CompletionProvider;

    #[tokio::test]
    async fn replies_with_profile_context() {
        let stub = Arc::new(StubLlm::replying("  Try a katori of dal with two rotis.  "));
        let llm: Arc<dyn CompletionProvider> = stub.clone();
        let body = json!({
            "message": "What should I eat for dinner?",
            "profile": { "weight_kg": 70, "height_cm": 172, "veg_flag": true, "activity_level": "light" },
            "context_flags": ["dinner"]
        });

        let response = send(state(Some(llm), None).await, json_request("POST", "/api/coach/ask", body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "reply": "Try a katori of dal with two rotis.", "citations": [] })
        );

        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("User profile: Weight 70kg, Height 172cm, Vegetarian, Activity: light"));
        assert!(prompts[0].contains("Focus areas: dinner"));
        assert!(prompts[0].ends_with("User Question: What should I eat for dinner?"));
    }

    #[tokio::test]
    async fn stored_profile_fills_context() {
        let stub = Arc::new(StubLlm::replying("ok"));
        let llm: Arc<dyn CompletionProvider> = stub.clone();
        let app = state(Some(llm), None).await;
        app.db
            .upsert_profile(ProfileUpdate {
                user_id: "u9".to_string(),
                weight_kg: Some(80.0),
                veg_flag: Some(false),
                activity_level: Some(ActivityLevel::Active),
                ..Default::default()
            })
            .await
            .unwrap();

        let body = json!({ "message": "Protein ideas?", "user_id": "u9" });
        let response = send(app, json_request("POST", "/api/coach/ask", body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let prompts = stub.prompts.lock().unwrap();
        assert!(prompts[0].contains("User profile: Weight 80kg, Height 165cm, Non-vegetarian, Activity: active"));
    }

    #[tokio::test]
    async fn missing_message_is_rejected() {
        let llm: Arc<dyn CompletionProvider> = Arc::new(StubLlm::replying("unused"));
        for body in [json!({}), json!({ "message": "   " })] {
            let response = send(state(Some(llm.clone()), None).await, json_request("POST", "/api/coach/ask", body)).await;
            let message = expect_error(response, StatusCode::BAD_REQUEST, "DataContract").await;
            assert_eq!(message, "No message provided");
        }
    }

    #[tokio::test]
    async fn missing_key_is_config_error() {
        let body = json!({ "message": "hi" });
        let response = send(state(None, None).await, json_request("POST", "/api/coach/ask", body)).await;
        expect_error(response, StatusCode::INTERNAL_SERVER_ERROR, "Config").await;
    }

    #[tokio::test]
    async fn vendor_failure_is_upstream() {
        let llm: Arc<dyn CompletionProvider> = Arc::new(StubLlm::failing("503 from vendor"));
        let body = json!({ "message": "hi" });
        let response = send(state(Some(llm), None).await, json_request("POST", "/api/coach/ask", body)).await;
        let message = expect_error(response, StatusCode::BAD_GATEWAY, "Upstream").await;
        assert!(message.starts_with("Failed to get response from Coach C"));
    }
}
