use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;
use validator::Validate;

use super::{ApiError, ApiResult, AppState};
use crate::database::{ProfileUpdate, UserProfile};

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

pub(crate) fn require_user(user_id: Option<&str>) -> ApiResult<&str> {
    user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::DataContract("user_id is required".to_string()))
}

pub async fn get_me(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> ApiResult<Json<UserProfile>> {
    let Query(query) = query?;
    let user_id = require_user(query.user_id.as_deref())?;

    state
        .db
        .get_profile(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<Json<UserProfile>> {
    let Json(update) = payload?;
    update.validate()?;

    Ok(Json(state.db.upsert_profile(update).await?))
}
