use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult, AppState};
use crate::food::analysis::{analyze_menu_image, read_menu_text, MenuAnalysis};
use crate::food::{extract_food_items, score_and_rank, DietProfile, FoodItem, RecommendationResult, ScoredItem};
use crate::providers::traits::ImageInput;
use crate::providers::utils::image_mime_type;

const IMAGE_FIELD: &str = "image";

const SCAN_ASSUMPTIONS: [&str; 3] = [
    "Portion sizes assumed as standard servings",
    "Vegetarian preference applied",
    "Nutrition values are approximate",
];

#[derive(Debug, Serialize)]
pub struct MenuScanResponse {
    pub items: Vec<FoodItem>,
    pub picks: Vec<ScoredItem>,
    pub alternates: Vec<ScoredItem>,
    pub avoid: Vec<ScoredItem>,
    pub assumptions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub items: Vec<FoodItem>,
    pub profile: Option<DietProfile>,
}

struct Upload {
    data: Vec<u8>,
    content_type: Option<String>,
}

impl Upload {
    fn image(&self) -> ImageInput<'_> {
        ImageInput {
            data: &self.data,
            mime_type: image_mime_type(self.content_type.as_deref()),
        }
    }
}

fn scan_profile() -> DietProfile {
    DietProfile { veg_flag: true }
}

async fn read_image(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<Upload> {
    let mut multipart = multipart.map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_rejection(e.status(), e.body_text()))?;
        if data.is_empty() {
            break;
        }

        return Ok(Upload {
            data: data.to_vec(),
            content_type,
        });
    }

    Err(ApiError::DataContract("No image file provided".to_string()))
}

/// Menu photo in, ranked dishes out. OCR trouble degrades to the canned menu
/// rather than failing the request.
pub async fn scan_menu(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<MenuScanResponse>> {
    let upload = read_image(multipart).await?;
    log::info!("Scanning menu image ({} bytes)", upload.data.len());

    let menu_text = read_menu_text(state.llm.as_deref(), upload.image(), state.config.ocr_timeout).await;
    let items = extract_food_items(&menu_text.text);
    let RecommendationResult { picks, alternates, avoid } = score_and_rank(&items, &scan_profile());

    log::info!(
        "Menu scan ({:?}): {} items, {} picks, {} alternates, {} avoid",
        menu_text.source,
        items.len(),
        picks.len(),
        alternates.len(),
        avoid.len()
    );

    Ok(Json(MenuScanResponse {
        items,
        picks,
        alternates,
        avoid,
        assumptions: SCAN_ASSUMPTIONS.iter().map(|a| a.to_string()).collect(),
    }))
}

pub async fn analyze_menu(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<MenuAnalysis>> {
    let upload = read_image(multipart).await?;
    let llm = state.llm()?;

    let analysis = analyze_menu_image(llm, upload.image())
        .await
        .map_err(|e| ApiError::upstream(format!("Failed to process image: {}", e)))?;

    Ok(Json(analysis))
}

pub async fn recommend(
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendationResult>> {
    let Json(request) = payload?;
    let profile = request.profile.unwrap_or_else(scan_profile);
    Ok(Json(score_and_rank(&request.items, &profile)))
}
