pub mod database;
pub mod models;

pub use database::Database;
pub use database::DatabaseError;
pub use models::{daily_totals, DailyTotals, FoodLogEntry, MealType, NewFoodLog, ProfileUpdate, UserProfile};
