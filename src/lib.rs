pub mod api;
pub mod coach;
pub mod commands;
pub mod config;
pub mod database;
pub mod food;
pub mod providers;

// Re-export commonly used items
pub use api::{create_api, AppState};
pub use config::AppConfig;
pub use database::Database;
pub use food::{extract_food_items, score_and_rank, DietProfile, FoodItem, RecommendationResult};
