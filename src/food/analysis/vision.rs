use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::providers::traits::{CompletionProvider, ImageInput};
use crate::providers::utils::strip_code_fences;

const ANALYSIS_PROMPT: &str = r#"You are an expert Indian nutrition coach. Analyze this restaurant menu image and provide food recommendations.

Extract all food items with their prices. For each item, categorize as:
- "recommended": High protein, balanced nutrition, fits Indian healthy eating
- "alternate": Moderate choice, acceptable with portion control
- "avoid": High calorie, processed, or nutritionally poor

Return JSON format:
{
  "ocr_method": "gemini_vision",
  "text": "extracted menu text",
  "recommendations": [
    {
      "name": "Food Item Name",
      "price": "₹XX or extracted price",
      "category": "recommended|alternate|avoid",
      "reason": "Brief nutrition reasoning"
    }
  ]
}"#;

const OCR_METHOD: &str = "gemini_vision";
const PROCESSING_TIME: &str = "< 2s";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Recommended,
    Alternate,
    Avoid,
}

impl Verdict {
    /// Case-insensitive; anything unrecognised is treated as an alternate.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "recommended" | "recommend" => Verdict::Recommended,
            "avoid" => Verdict::Avoid,
            _ => Verdict::Alternate,
        }
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Verdict::parse).unwrap_or(Verdict::Alternate))
    }
}

/// Models return prices as "₹280", 280 or null.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(price) => price,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuRecommendation {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: String,
    pub category: Verdict,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct ModelAnalysis {
    #[serde(default)]
    ocr_method: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    recommendations: Vec<MenuRecommendation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuAnalysis {
    pub ocr_method: String,
    pub text: String,
    pub recommendations: Vec<MenuRecommendation>,
    pub processing_time: &'static str,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_ai_response: Option<String>,
}

/// Turns the model's reply into an analysis, degrading to a placeholder
/// recommendation when the reply is not the JSON we asked for.
pub fn parse_analysis(raw: &str) -> MenuAnalysis {
    match serde_json::from_str::<ModelAnalysis>(strip_code_fences(raw)) {
        Ok(parsed) => MenuAnalysis {
            ocr_method: parsed.ocr_method.unwrap_or_else(|| OCR_METHOD.to_string()),
            text: parsed.text,
            recommendations: parsed.recommendations,
            processing_time: PROCESSING_TIME,
            confidence: 0.9,
            raw_ai_response: None,
        },
        Err(e) => {
            log::error!("Failed to parse menu analysis as JSON: {}", e);
            log::debug!("Raw model response: {}", raw);
            MenuAnalysis {
                ocr_method: OCR_METHOD.to_string(),
                text: raw.to_string(),
                recommendations: vec![MenuRecommendation {
                    name: "Unable to parse menu items".to_string(),
                    price: "N/A".to_string(),
                    category: Verdict::Alternate,
                    reason: "Gemini response parsing failed".to_string(),
                }],
                processing_time: PROCESSING_TIME,
                confidence: 0.5,
                raw_ai_response: Some(raw.to_string()),
            }
        }
    }
}

pub async fn analyze_menu_image(
    provider: &dyn CompletionProvider,
    image: ImageInput<'_>,
) -> Result<MenuAnalysis> {
    log::info!("Analyzing menu image with {}", provider.model_name());
    let raw = provider.complete_with_image(ANALYSIS_PROMPT, image).await?;
    Ok(parse_analysis(&raw))
}
