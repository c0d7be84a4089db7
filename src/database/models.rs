use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::food::catalog::lookup;
use crate::food::scoring::DietProfile;
use crate::food::tdee::ActivityLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub veg_flag: bool,
    pub locale: String,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The profile a user gets on first sign-in.
    pub fn onboarding(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: "User".to_string(),
            height_cm: 165.0,
            weight_kg: 65.0,
            activity_level: ActivityLevel::Moderate,
            veg_flag: true,
            locale: "en".to_string(),
            updated_at: Utc::now(),
        }
    }

    pub fn diet(&self) -> DietProfile {
        DietProfile {
            veg_flag: self.veg_flag,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 50.0, max = 272.0))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 2.0, max = 635.0))]
    pub weight_kg: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub veg_flag: Option<bool>,
    #[validate(length(min = 2, max = 16))]
    pub locale: Option<String>,
}

impl ProfileUpdate {
    /// Overlays the provided fields on `base`.
    pub fn apply(self, mut base: UserProfile, now: DateTime<Utc>) -> UserProfile {
        if let Some(name) = self.name {
            base.name = name;
        }
        if let Some(height_cm) = self.height_cm {
            base.height_cm = height_cm;
        }
        if let Some(weight_kg) = self.weight_kg {
            base.weight_kg = weight_kg;
        }
        if let Some(activity_level) = self.activity_level {
            base.activity_level = activity_level.normalized();
        }
        if let Some(veg_flag) = self.veg_flag {
            base.veg_flag = veg_flag;
        }
        if let Some(locale) = self.locale {
            base.locale = locale;
        }
        base.updated_at = now;
        base
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub calories: i32,
    pub protein_g: f64,
    pub fiber_g: f64,
    pub sodium_mg: i32,
    pub servings: f64,
    pub meal_type: MealType,
    pub logged_at: DateTime<Utc>,
}

impl FoodLogEntry {
    pub fn log_date(&self) -> NaiveDate {
        self.logged_at.date_naive()
    }
}

fn one_serving() -> f64 {
    1.0
}

/// A log request. Nutrition fields may be left out for catalog dishes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewFoodLog {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0, max = 10000))]
    pub calories: Option<i32>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub protein_g: Option<f64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub fiber_g: Option<f64>,
    #[validate(range(min = 0, max = 100000))]
    pub sodium_mg: Option<i32>,
    #[serde(default = "one_serving")]
    #[validate(range(min = 0.1, max = 50.0))]
    pub servings: f64,
    #[serde(default)]
    pub meal_type: MealType,
    pub logged_at: Option<DateTime<Utc>>,
}

impl NewFoodLog {
    /// Fills missing nutrition from the catalog. Returns `None` when the dish is
    /// not in the catalog and no calories were given.
    pub fn into_entry(self, now: DateTime<Utc>) -> Option<FoodLogEntry> {
        let catalog = lookup(self.name.trim());
        let calories = self.calories.or(catalog.map(|c| c.calories))?;

        Some(FoodLogEntry {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            calories,
            protein_g: self.protein_g.or(catalog.map(|c| c.protein_g)).unwrap_or(0.0),
            fiber_g: self.fiber_g.or(catalog.map(|c| c.fiber_g)).unwrap_or(0.0),
            sodium_mg: self.sodium_mg.or(catalog.map(|c| c.sodium_mg)).unwrap_or(0),
            name: self.name,
            servings: self.servings,
            meal_type: self.meal_type,
            logged_at: self.logged_at.unwrap_or(now),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub fiber_g: f64,
    pub sodium_mg: f64,
    pub entries: usize,
}

pub fn daily_totals(entries: &[FoodLogEntry]) -> DailyTotals {
    entries.iter().fold(DailyTotals::default(), |mut totals, e| {
        totals.calories += f64::from(e.calories) * e.servings;
        totals.protein_g += e.protein_g * e.servings;
        totals.fiber_g += e.fiber_g * e.servings;
        totals.sodium_mg += f64::from(e.sodium_mg) * e.servings;
        totals.entries += 1;
        totals
    })
}
