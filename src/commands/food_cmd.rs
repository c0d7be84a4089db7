use std::path::Path;

use colored::Colorize;
use validator::Validate;

use crate::database::{DailyTotals, FoodLogEntry};
use crate::food::tdee::{tdee_kcal, ActivityLevel, Sex, TdeeRequest};
use crate::food::{extract_food_items, score_and_rank, DietProfile, RecommendationResult, ScoredItem};

pub async fn score_menu_file(path: &Path, diet: &DietProfile) -> Result<RecommendationResult, String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read menu file {}: {}", path.display(), e))?;

    Ok(score_and_rank(&extract_food_items(&text), diet))
}

/// `dal tadka, roti, biryani` scored as if each dish were a menu line.
pub fn score_dishes(args: &str, diet: &DietProfile) -> Result<RecommendationResult, String> {
    if args.trim().is_empty() {
        return Err("Please list one or more dishes, separated by commas.".to_string());
    }
    let text = args.split(',').collect::<Vec<_>>().join("\n");
    Ok(score_and_rank(&extract_food_items(&text), diet))
}

fn format_tier(out: &mut String, title: &str, items: &[ScoredItem]) {
    out.push_str(&format!("{}\n", title));
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for scored in items {
        out.push_str(&format!(
            "  {:<16} {:>4}  {} kcal, {}g protein, {}g fiber, {}mg sodium  {}\n",
            scored.item.name,
            scored.score,
            scored.item.calories,
            scored.item.protein_g,
            scored.item.fiber_g,
            scored.item.sodium_mg,
            scored.reason.dimmed()
        ));
    }
}

pub fn format_recommendations(result: &RecommendationResult) -> String {
    let mut out = String::new();
    format_tier(&mut out, &"✅ Top picks".green().bold().to_string(), &result.picks);
    format_tier(&mut out, &"🔄 Alternates".yellow().bold().to_string(), &result.alternates);
    format_tier(&mut out, &"⚠️ Avoid".red().bold().to_string(), &result.avoid);
    out
}

/// `<male|female> <age> <height_cm> <weight_kg> [activity]`
pub fn parse_tdee(args: &str) -> Result<TdeeRequest, String> {
    const USAGE: &str = "Usage: tdee <male|female> <age> <height_cm> <weight_kg> [activity]";

    let parts: Vec<&str> = args.split_whitespace().collect();
    if !(4..=5).contains(&parts.len()) {
        return Err(USAGE.to_string());
    }

    let sex = match parts[0].to_lowercase().as_str() {
        "male" | "m" => Sex::Male,
        "female" | "f" => Sex::Female,
        _ => Sex::Other,
    };
    let age = parts[1].parse().map_err(|_| USAGE.to_string())?;
    let height_cm = parts[2].parse().map_err(|_| USAGE.to_string())?;
    let weight_kg = parts[3].parse().map_err(|_| USAGE.to_string())?;
    let activity_level = parts
        .get(4)
        .map(|a| ActivityLevel::parse(&a.to_lowercase()))
        .unwrap_or_default();

    let request = TdeeRequest {
        sex,
        age,
        height_cm,
        weight_kg,
        activity_level,
    };
    request.validate().map_err(|e| e.to_string())?;
    Ok(request)
}

pub fn format_tdee(request: &TdeeRequest) -> String {
    format!(
        "🔥 Estimated TDEE: {} kcal/day ({} activity)",
        tdee_kcal(request).to_string().bold(),
        request.activity_level.as_str()
    )
}

/// `<dish> [servings]`; a trailing number is the serving count.
pub fn parse_log(args: &str) -> Result<(String, f64), String> {
    let mut words: Vec<&str> = args.split_whitespace().collect();
    let servings = match words.last().and_then(|w| w.parse::<f64>().ok()) {
        Some(servings) if words.len() > 1 => {
            words.pop();
            servings
        }
        _ => 1.0,
    };

    if words.is_empty() {
        return Err("Usage: log <dish> [servings]".to_string());
    }
    if !(0.1..=50.0).contains(&servings) {
        return Err("Servings must be between 0.1 and 50".to_string());
    }

    Ok((words.join(" "), servings))
}

pub fn format_day(entries: &[FoodLogEntry], totals: &DailyTotals) -> String {
    if entries.is_empty() {
        return "Nothing logged today yet.".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "  {} {:<16} x{}  {} kcal\n",
            entry.logged_at.format("%H:%M").to_string().dimmed(),
            entry.name,
            entry.servings,
            (f64::from(entry.calories) * entry.servings).round()
        ));
    }
    out.push_str(&format!(
        "{} {} kcal, {:.1}g protein, {:.1}g fiber, {} mg sodium",
        "Totals:".bold(),
        totals.calories.round(),
        totals.protein_g,
        totals.fiber_g,
        totals.sodium_mg.round()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn tdee_arguments() {
        let request = parse_tdee("male 28 175 70 moderate").unwrap();
        assert_eq!(tdee_kcal(&request), 2646);

        let request = parse_tdee("F 25 160 55 light").unwrap();
        assert_eq!(tdee_kcal(&request), 1847);

        assert!(parse_tdee("male 28 175").is_err());
        assert!(parse_tdee("male old 175 70").is_err());
        assert!(parse_tdee("male 28 20 70").is_err());
    }

    #[test]
    fn tdee_activity_defaults_to_moderate() {
        let request = parse_tdee("female 40 165 60").unwrap();
        assert_eq!(request.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn log_arguments() {
        assert_eq!(parse_log("dal tadka").unwrap(), ("dal tadka".to_string(), 1.0));
        assert_eq!(parse_log("roti 2").unwrap(), ("roti".to_string(), 2.0));
        assert_eq!(parse_log("7up").unwrap(), ("7up".to_string(), 1.0));
        assert!(parse_log("").is_err());
        assert!(parse_log("roti 0").is_err());
    }

    #[test]
    fn dishes_are_scored_as_menu_lines() {
        let result = score_dishes("rajma, biryani", &DietProfile { veg_flag: true }).unwrap();
        assert_eq!(result.picks[0].item.name, "Rajma");
        assert_eq!(result.avoid[0].item.name, "Biryani");
        assert!(score_dishes("  ", &DietProfile::default()).is_err());
    }

    #[test]
    fn recommendation_listing() {
        plain();
        let result = score_dishes("rajma, biryani", &DietProfile { veg_flag: true }).unwrap();
        let text = format_recommendations(&result);
        assert!(text.contains("Rajma"));
        assert!(text.contains("Good protein, High fiber, Balanced calories, Vegetarian"));
        assert!(text.contains("Alternates\n  (none)"));
    }

    #[tokio::test]
    async fn missing_menu_file() {
        let err = score_menu_file(Path::new("/definitely/not/here.txt"), &DietProfile::default())
            .await
            .unwrap_err();
        assert!(err.starts_with("Failed to read menu file"));
    }
}
