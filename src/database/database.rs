use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use rusqlite::{params, OptionalExtension, Row};
use thiserror::Error;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use super::models::{FoodLogEntry, MealType, ProfileUpdate, UserProfile};
use crate::food::tdee::ActivityLevel;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),
    #[error("Database connection error: {0}")]
    Connection(String),
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Connection>,
}

impl Database {
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Self::with_connection(conn).await
    }

    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let db = Self {
            conn: Arc::new(conn),
        };
        db.initialize().await?;
        Ok(db)
    }

    async fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS profiles (
                        user_id TEXT PRIMARY KEY,
                        name TEXT NOT NULL,
                        height_cm REAL NOT NULL,
                        weight_kg REAL NOT NULL,
                        activity_level TEXT NOT NULL,
                        veg_flag INTEGER NOT NULL,
                        locale TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    );
                    CREATE TABLE IF NOT EXISTS food_logs (
                        id TEXT PRIMARY KEY,
                        user_id TEXT NOT NULL,
                        name TEXT NOT NULL,
                        calories INTEGER NOT NULL,
                        protein_g REAL NOT NULL,
                        fiber_g REAL NOT NULL,
                        sodium_mg INTEGER NOT NULL,
                        servings REAL NOT NULL,
                        meal_type TEXT NOT NULL,
                        logged_at TEXT NOT NULL,
                        log_date TEXT NOT NULL
                    );
                    CREATE INDEX IF NOT EXISTS idx_food_logs_user_date
                        ON food_logs (user_id, log_date);",
                )?;
                Ok(())
            })
            .await?;

        info!("Database initialized successfully");
        Ok(())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, DatabaseError> {
        let user_id = user_id.to_string();
        let profile = self.conn
            .call(move |conn| {
                let profile = conn
                    .query_row(
                        "SELECT user_id, name, height_cm, weight_kg, activity_level, veg_flag, locale, updated_at
                         FROM profiles WHERE user_id = ?1",
                        [&user_id],
                        profile_from_row,
                    )
                    .optional()?;
                Ok(profile)
            })
            .await?;

        Ok(profile)
    }

    /// Merges `update` over the stored profile, or over the onboarding defaults
    /// when the user has none yet, and writes the result.
    pub async fn upsert_profile(&self, update: ProfileUpdate) -> Result<UserProfile, DatabaseError> {
        let profile = self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let existing = tx
                    .query_row(
                        "SELECT user_id, name, height_cm, weight_kg, activity_level, veg_flag, locale, updated_at
                         FROM profiles WHERE user_id = ?1",
                        [&update.user_id],
                        profile_from_row,
                    )
                    .optional()?;

                let base = existing.unwrap_or_else(|| UserProfile::onboarding(&update.user_id));
                let profile = update.apply(base, Utc::now());

                tx.execute(
                    "INSERT INTO profiles (user_id, name, height_cm, weight_kg, activity_level, veg_flag, locale, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(user_id) DO UPDATE SET
                        name = excluded.name,
                        height_cm = excluded.height_cm,
                        weight_kg = excluded.weight_kg,
                        activity_level = excluded.activity_level,
                        veg_flag = excluded.veg_flag,
                        locale = excluded.locale,
                        updated_at = excluded.updated_at",
                    params![
                        profile.user_id,
                        profile.name,
                        profile.height_cm,
                        profile.weight_kg,
                        profile.activity_level.as_str(),
                        profile.veg_flag,
                        profile.locale,
                        profile.updated_at,
                    ],
                )?;
                tx.commit()?;

                Ok(profile)
            })
            .await?;

        info!("Saved profile for user {}", profile.user_id);
        Ok(profile)
    }

    pub async fn add_food_log(&self, entry: FoodLogEntry) -> Result<FoodLogEntry, DatabaseError> {
        let saved = self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO food_logs
                        (id, user_id, name, calories, protein_g, fiber_g, sodium_mg, servings, meal_type, logged_at, log_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                    params![
                        entry.id.to_string(),
                        entry.user_id,
                        entry.name,
                        entry.calories,
                        entry.protein_g,
                        entry.fiber_g,
                        entry.sodium_mg,
                        entry.servings,
                        entry.meal_type.as_str(),
                        entry.logged_at,
                        entry.log_date(),
                    ],
                )?;
                Ok(entry)
            })
            .await?;

        Ok(saved)
    }

    /// Entries logged on `date` (UTC), newest first.
    pub async fn food_logs_for_day(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<FoodLogEntry>, DatabaseError> {
        let user_id = user_id.to_string();
        let entries = self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, name, calories, protein_g, fiber_g, sodium_mg, servings, meal_type, logged_at
                     FROM food_logs
                     WHERE user_id = ?1 AND log_date = ?2
                     ORDER BY logged_at DESC, rowid DESC",
                )?;

                let rows = stmt.query_map(params![user_id, date], food_log_from_row)?;

                let mut entries = Vec::new();
                for row in rows {
                    entries.push(row?);
                }
                Ok(entries)
            })
            .await?;

        Ok(entries)
    }
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        user_id: row.get(0)?,
        name: row.get(1)?,
        height_cm: row.get(2)?,
        weight_kg: row.get(3)?,
        activity_level: ActivityLevel::parse(&row.get::<_, String>(4)?),
        veg_flag: row.get(5)?,
        locale: row.get(6)?,
        updated_at: row.get::<_, DateTime<Utc>>(7)?,
    })
}

fn food_log_from_row(row: &Row<'_>) -> rusqlite::Result<FoodLogEntry> {
    let id: String = row.get(0)?;
    let meal_type: String = row.get(8)?;

    Ok(FoodLogEntry {
        id: Uuid::parse_str(&id).map_err(|e| conversion_error(0, e))?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        calories: row.get(3)?,
        protein_g: row.get(4)?,
        fiber_g: row.get(5)?,
        sodium_mg: row.get(6)?,
        servings: row.get(7)?,
        meal_type: MealType::parse(&meal_type).unwrap_or_default(),
        logged_at: row.get(9)?,
    })
}
