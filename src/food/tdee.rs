use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
    #[serde(other)]
    Unknown,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate | ActivityLevel::Unknown => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Unrecognised levels are treated as moderate.
    pub fn normalized(self) -> Self {
        match self {
            ActivityLevel::Unknown => ActivityLevel::Moderate,
            level => level,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate | ActivityLevel::Unknown => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Unknown,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TdeeRequest {
    pub sex: Sex,
    #[validate(range(min = 1, max = 120))]
    pub age: u32,
    #[validate(range(min = 50.0, max = 272.0))]
    pub height_cm: f64,
    #[validate(range(min = 2.0, max = 635.0))]
    pub weight_kg: f64,
    #[serde(default)]
    pub activity_level: ActivityLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct TdeeResponse {
    pub tdee_kcal: u32,
}

/// Harris-Benedict basal metabolic rate, kcal/day.
pub fn bmr_kcal(sex: Sex, age: u32, height_cm: f64, weight_kg: f64) -> f64 {
    let age = f64::from(age);
    match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Sex::Female | Sex::Other => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    }
}

pub fn tdee_kcal(req: &TdeeRequest) -> u32 {
    let bmr = bmr_kcal(req.sex, req.age, req.height_cm, req.weight_kg);
    (bmr * req.activity_level.multiplier()).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> TdeeRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn male_moderate() {
        let req = request(serde_json::json!({
            "sex": "male", "age": 28, "height_cm": 175, "weight_kg": 70, "activity_level": "moderate"
        }));
        assert_eq!(tdee_kcal(&req), 2646);
    }

    #[test]
    fn female_light() {
        let req = request(serde_json::json!({
            "sex": "female", "age": 25, "height_cm": 160, "weight_kg": 55, "activity_level": "light"
        }));
        assert_eq!(tdee_kcal(&req), 1847);
    }

    #[test]
    fn unknown_activity_uses_moderate_multiplier() {
        let req = request(serde_json::json!({
            "sex": "male", "age": 28, "height_cm": 175, "weight_kg": 70, "activity_level": "couch"
        }));
        assert_eq!(req.activity_level, ActivityLevel::Unknown);
        assert_eq!(tdee_kcal(&req), 2646);
    }

    #[test]
    fn missing_activity_defaults_to_moderate() {
        let req = request(serde_json::json!({
            "sex": "female", "age": 25, "height_cm": 160, "weight_kg": 55
        }));
        assert_eq!(req.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn unrecognised_sex_uses_female_formula() {
        assert_eq!(
            bmr_kcal(Sex::Other, 30, 170.0, 60.0),
            bmr_kcal(Sex::Female, 30, 170.0, 60.0)
        );
    }

    #[test]
    fn validation_rejects_out_of_range() {
        let req = request(serde_json::json!({
            "sex": "male", "age": 0, "height_cm": 175, "weight_kg": 70
        }));
        assert!(req.validate().is_err());

        let req = request(serde_json::json!({
            "sex": "male", "age": 30, "height_cm": 175, "weight_kg": 70
        }));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn parse_activity_level() {
        assert_eq!(ActivityLevel::parse("Very_Active"), ActivityLevel::VeryActive);
        assert_eq!(ActivityLevel::parse("??"), ActivityLevel::Unknown);
        assert_eq!(ActivityLevel::Unknown.as_str(), "moderate");
    }
}
