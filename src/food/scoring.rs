use serde::{Deserialize, Serialize};

use super::catalog::FoodItem;

const PICK_SLOTS: usize = 3;
const ALTERNATE_SLOTS: std::ops::Range<usize> = 3..5;
const AVOID_SLOTS: usize = 3;

/// The part of a user's profile the scorer looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietProfile {
    #[serde(default)]
    pub veg_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: FoodItem,
    pub score: i32,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub picks: Vec<ScoredItem>,
    pub alternates: Vec<ScoredItem>,
    pub avoid: Vec<ScoredItem>,
}

pub fn score_item(item: &FoodItem, profile: &DietProfile) -> ScoredItem {
    let mut score = 0;
    let mut reasons: Vec<&str> = Vec::new();

    if item.protein_g >= 15.0 {
        score += 20;
        reasons.push("High protein");
    } else if item.protein_g >= 8.0 {
        score += 10;
        reasons.push("Good protein");
    }

    if item.fiber_g >= 5.0 {
        score += 15;
        reasons.push("High fiber");
    } else if item.fiber_g >= 3.0 {
        score += 8;
        reasons.push("Good fiber");
    }

    if (200..=300).contains(&item.calories) {
        score += 10;
        reasons.push("Balanced calories");
    } else if item.calories > 400 {
        score -= 15;
        reasons.push("High calorie");
    }

    if item.sodium_mg > 800 {
        score -= 20;
        reasons.push("High sodium");
    } else if item.sodium_mg > 500 {
        score -= 10;
        reasons.push("Moderate sodium");
    }

    if profile.veg_flag && !item.category.is_meat() {
        score += 5;
        reasons.push("Vegetarian");
    }

    let reason = if reasons.is_empty() {
        "Standard option".to_string()
    } else {
        reasons.join(", ")
    };

    ScoredItem {
        item: item.clone(),
        score,
        reason,
    }
}

/// Scores every item and splits the ranking into picks, alternates and avoid.
///
/// Each tier is a fixed slice of the sorted list, filtered afterwards by its
/// score threshold. An item past the alternates slice is never an alternate,
/// whatever its score.
pub fn score_and_rank(items: &[FoodItem], profile: &DietProfile) -> RecommendationResult {
    let mut scored: Vec<ScoredItem> = items.iter().map(|item| score_item(item, profile)).collect();

    // stable: ties keep input order
    scored.sort_by(|a, b| b.score.cmp(&a.score));

    let picks = slice(&scored, 0..PICK_SLOTS)
        .iter()
        .filter(|s| s.score > 10)
        .cloned()
        .collect();

    let alternates = slice(&scored, ALTERNATE_SLOTS)
        .iter()
        .filter(|s| s.score >= 0)
        .cloned()
        .collect();

    let tail_start = scored.len().saturating_sub(AVOID_SLOTS);
    let avoid = scored[tail_start..]
        .iter()
        .filter(|s| s.score < 0)
        .cloned()
        .collect();

    RecommendationResult {
        picks,
        alternates,
        avoid,
    }
}

fn slice(items: &[ScoredItem], range: std::ops::Range<usize>) -> &[ScoredItem] {
    let end = range.end.min(items.len());
    let start = range.start.min(end);
    &items[start..end]
}
