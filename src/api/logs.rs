use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::profile::require_user;
use super::{ApiError, ApiResult, AppState};
use crate::database::{daily_totals, DailyTotals, FoodLogEntry, NewFoodLog};

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub user_id: Option<String>,
    /// `YYYY-MM-DD`, UTC. Defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DayLog {
    pub date: NaiveDate,
    pub entries: Vec<FoodLogEntry>,
    pub totals: DailyTotals,
}

pub async fn add_log(
    State(state): State<AppState>,
    payload: Result<Json<NewFoodLog>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FoodLogEntry>)> {
    let Json(request) = payload?;
    request.validate()?;

    let name = request.name.clone();
    let entry = request
        .into_entry(Utc::now())
        .ok_or_else(|| ApiError::DataContract(format!("Unknown food '{}': provide calories", name)))?;

    let saved = state.db.add_food_log(entry).await?;
    log::info!("Logged {} for user {}", saved.name, saved.user_id);
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn day_logs(
    State(state): State<AppState>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> ApiResult<Json<DayLog>> {
    let Query(query) = query?;
    let user_id = require_user(query.user_id.as_deref())?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let entries = state.db.food_logs_for_day(user_id, date).await?;
    let totals = daily_totals(&entries);

    Ok(Json(DayLog { date, entries, totals }))
}
