use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::database::UserProfile;
use crate::providers::traits::CompletionProvider;

pub const COACH_SYSTEM_PROMPT: &str = r#"You are Coach C, an empathetic Indian health, fitness, and nutrition coach. You are science-first: no fads, no pseudoscience.

Always:
- Personalize using the user's profile and context
- Prefer Indian dishes and units; quantify in katori (ml), roti count/diameter, ladle, piece; grams only when needed
- Suggest protein-forward, budget-aware options with practical swaps (tawa vs butter; dal without tadka; grilled/air-fried vs fried)
- Keep tone non-judgmental, emphasize small wins
- Default guardrails:
  • Protein: start 0.83 g/kg/d; if fat-loss/strength, ~1.2–1.6 g/kg/d with vegetarian/Jain plans
  • Fiber: ~25–40 g/d from dal, chana, veggies, fruit, whole grains; ramp gradually
  • Sodium: <2,000 mg/d (≈5 g salt)
  • Free sugars: <10% kcal (prefer <5%)

Be explicit about assumptions (e.g., roti 16–18 cm; katori 150 ml) and ask max one clarifying question when confidence is low.
Provide short, clear action steps; never moralize. Add this disclaimer: "General guidance only; not medical advice. Consult a clinician for red-flag symptoms."
If the user requests unsafe methods, decline and offer evidence-based alternatives.

Keep responses conversational and under 150 words."#;

/// Profile fields the coach puts into context. Everything is optional; the
/// client may send a partial profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachProfile {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub veg_flag: bool,
    pub activity_level: Option<String>,
}

impl From<&UserProfile> for CoachProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            weight_kg: Some(profile.weight_kg),
            height_cm: Some(profile.height_cm),
            veg_flag: profile.veg_flag,
            activity_level: Some(profile.activity_level.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachReply {
    pub reply: String,
    pub citations: Vec<String>,
}

pub fn context_line(profile: Option<&CoachProfile>) -> String {
    match profile {
        Some(p) => format!(
            "User profile: Weight {}kg, Height {}cm, {}, Activity: {}",
            p.weight_kg.filter(|w| *w > 0.0).unwrap_or(65.0),
            p.height_cm.filter(|h| *h > 0.0).unwrap_or(165.0),
            if p.veg_flag { "Vegetarian" } else { "Non-vegetarian" },
            p.activity_level.as_deref().filter(|a| !a.is_empty()).unwrap_or("moderate"),
        ),
        None => "No profile data available".to_string(),
    }
}

pub fn build_prompt(message: &str, profile: Option<&CoachProfile>, context_flags: &[String]) -> String {
    let mut context = context_line(profile);
    if !context_flags.is_empty() {
        context.push_str(&format!("\nFocus areas: {}", context_flags.join(", ")));
    }

    format!(
        "{}\n\nUser Context: {}\nUser Question: {}",
        COACH_SYSTEM_PROMPT, context, message
    )
}

pub async fn ask_coach(
    provider: &dyn CompletionProvider,
    message: &str,
    profile: Option<&CoachProfile>,
    context_flags: &[String],
) -> Result<CoachReply> {
    let prompt = build_prompt(message, profile, context_flags);
    let reply = provider.complete(&prompt).await?;

    Ok(CoachReply {
        reply: reply.trim().to_string(),
        citations: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_uses_defaults_for_missing_fields() {
        let profile = CoachProfile {
            veg_flag: true,
            ..Default::default()
        };
        assert_eq!(
            context_line(Some(&profile)),
            "User profile: Weight 65kg, Height 165cm, Vegetarian, Activity: moderate"
        );
    }

    #[test]
    fn context_formats_full_profile() {
        let profile = CoachProfile {
            weight_kg: Some(72.5),
            height_cm: Some(178.0),
            veg_flag: false,
            activity_level: Some("active".to_string()),
        };
        assert_eq!(
            context_line(Some(&profile)),
            "User profile: Weight 72.5kg, Height 178cm, Non-vegetarian, Activity: active"
        );
    }

    #[test]
    fn stored_profile_converts() {
        let stored = UserProfile::onboarding("u1");
        assert_eq!(
            context_line(Some(&CoachProfile::from(&stored))),
            "User profile: Weight 65kg, Height 165cm, Vegetarian, Activity: moderate"
        );
    }

    #[test]
    fn zero_measurements_use_defaults() {
        let profile = CoachProfile {
            weight_kg: Some(0.0),
            height_cm: Some(0.0),
            veg_flag: false,
            activity_level: Some(String::new()),
        };
        assert_eq!(
            context_line(Some(&profile)),
            "User profile: Weight 65kg, Height 165cm, Non-vegetarian, Activity: moderate"
        );
    }

    #[test]
    fn no_profile_context() {
        assert_eq!(context_line(None), "No profile data available");
    }

    #[test]
    fn prompt_layout() {
        let flags = vec!["nutrition".to_string(), "indian_diet".to_string()];
        let prompt = build_prompt("Is poha a good breakfast?", None, &flags);

        assert!(prompt.starts_with("You are Coach C"));
        assert!(prompt.ends_with(
            "User Context: No profile data available\nFocus areas: nutrition, indian_diet\nUser Question: Is poha a good breakfast?"
        ));
    }
}
