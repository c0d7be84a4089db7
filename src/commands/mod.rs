use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use colored::Colorize;

use crate::coach::{ask_coach, CoachProfile};
use crate::database::{daily_totals, Database, MealType, NewFoodLog};
use crate::food::DietProfile;
use crate::providers::traits::CompletionProvider;

pub mod food_cmd;
mod system;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Exit,
}

/// Interactive Coach C session: dispatches REPL lines to menu, log and tool
/// commands, and sends everything else to the coach.
pub struct CommandHandler {
    provider: Option<Arc<dyn CompletionProvider>>,
    db: Database,
    user_id: String,
    diet: DietProfile,
}

impl CommandHandler {
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        db: Database,
        user_id: impl Into<String>,
        diet: DietProfile,
    ) -> Self {
        Self {
            provider,
            db,
            user_id: user_id.into(),
            diet,
        }
    }

    pub fn diet(&self) -> DietProfile {
        self.diet
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<CommandOutcome, String> {
        let input = input.trim();
        let (command, args) = match input.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "" => Ok(CommandOutcome::Continue),
            "help" | "exit" | "quit" => system::handle_command(command),
            "menu" => {
                if args.is_empty() {
                    return Err("Please specify a menu text file.".to_string());
                }
                let result = food_cmd::score_menu_file(Path::new(args), &self.diet).await?;
                println!("{}", food_cmd::format_recommendations(&result));
                Ok(CommandOutcome::Continue)
            }
            "score" => {
                let result = food_cmd::score_dishes(args, &self.diet)?;
                println!("{}", food_cmd::format_recommendations(&result));
                Ok(CommandOutcome::Continue)
            }
            "veg" => {
                self.diet.veg_flag = match args.to_lowercase().as_str() {
                    "on" | "yes" | "true" => true,
                    "off" | "no" | "false" => false,
                    _ => return Err("Usage: veg on|off".to_string()),
                };
                println!(
                    "Vegetarian preference {}",
                    if self.diet.veg_flag { "on".green() } else { "off".yellow() }
                );
                Ok(CommandOutcome::Continue)
            }
            "tdee" => {
                let request = food_cmd::parse_tdee(args)?;
                println!("{}", food_cmd::format_tdee(&request));
                Ok(CommandOutcome::Continue)
            }
            "log" => {
                self.log_dish(args).await?;
                Ok(CommandOutcome::Continue)
            }
            "today" => {
                self.show_today().await?;
                Ok(CommandOutcome::Continue)
            }
            _ => {
                self.ask(input).await?;
                Ok(CommandOutcome::Continue)
            }
        }
    }

    async fn log_dish(&self, args: &str) -> Result<(), String> {
        let (name, servings) = food_cmd::parse_log(args)?;
        let request = NewFoodLog {
            user_id: self.user_id.clone(),
            name,
            calories: None,
            protein_g: None,
            fiber_g: None,
            sodium_mg: None,
            servings,
            meal_type: MealType::default(),
            logged_at: None,
        };

        let entry = request
            .into_entry(Utc::now())
            .ok_or_else(|| "That dish is not in the catalog; log it through the API with calories.".to_string())?;
        let saved = self
            .db
            .add_food_log(entry)
            .await
            .map_err(|e| format!("Failed to save log: {}", e))?;

        println!("📒 Logged {} x{} ({} kcal each)", saved.name, saved.servings, saved.calories);
        Ok(())
    }

    async fn show_today(&self) -> Result<(), String> {
        let entries = self
            .db
            .food_logs_for_day(&self.user_id, Utc::now().date_naive())
            .await
            .map_err(|e| format!("Failed to load logs: {}", e))?;

        println!("{}", food_cmd::format_day(&entries, &daily_totals(&entries)));
        Ok(())
    }

    async fn ask(&self, message: &str) -> Result<(), String> {
        let provider = self
            .provider
            .as_deref()
            .ok_or_else(|| "Coach C is offline: set GEMINI_API_KEY to chat.".to_string())?;

        let stored = self
            .db
            .get_profile(&self.user_id)
            .await
            .map_err(|e| format!("Failed to load profile: {}", e))?;
        let mut profile = stored.as_ref().map(CoachProfile::from).unwrap_or_default();
        profile.veg_flag = self.diet.veg_flag;

        let reply = ask_coach(provider, message, Some(&profile), &[])
            .await
            .map_err(|e| format!("AI error: {}", e))?;

        println!("{} {}", "🥗 Coach C:".bright_green().bold(), reply.reply);
        Ok(())
    }
}
