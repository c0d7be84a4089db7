pub mod analysis;
pub mod catalog;
pub mod extract;
pub mod scoring;
pub mod tdee;

// Re-export common types
pub use catalog::{Category, FoodItem, CATALOG};
pub use extract::extract_food_items;
pub use scoring::{score_and_rank, DietProfile, RecommendationResult, ScoredItem};
