use axum::{extract::rejection::JsonRejection, Json};
use validator::Validate;

use super::ApiResult;
use crate::food::tdee::{tdee_kcal, TdeeRequest, TdeeResponse};

pub async fn tdee(payload: Result<Json<TdeeRequest>, JsonRejection>) -> ApiResult<Json<TdeeResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    Ok(Json(TdeeResponse {
        tdee_kcal: tdee_kcal(&request),
    }))
}
