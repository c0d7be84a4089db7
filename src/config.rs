use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DEEPGRAM_API_URL: &str = "https://api.deepgram.com/v1";
pub const DEFAULT_DATABASE_PATH: &str = "data/fitbear.db";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini: GeminiConfig,
    pub deepgram_api_key: Option<String>,
    pub deepgram: DeepgramConfig,
    pub database_path: String,
    pub ocr_timeout: Duration,
    pub max_upload_bytes: usize,
    pub max_concurrent_requests: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini: GeminiConfig {
                model: DEFAULT_GEMINI_MODEL.to_string(),
                api_url: DEFAULT_GEMINI_API_URL.to_string(),
            },
            deepgram_api_key: None,
            deepgram: DeepgramConfig {
                api_url: DEFAULT_DEEPGRAM_API_URL.to_string(),
            },
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            ocr_timeout: Duration::from_secs(10),
            max_upload_bytes: 10 * 1024 * 1024,
            max_concurrent_requests: 64,
        }
    }
}

impl AppConfig {
    /// Reads the process environment; call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let gemini_api_key = non_empty("GEMINI_API_KEY");
        if gemini_api_key.is_none() {
            log::warn!("GEMINI_API_KEY not set; menu OCR will use the fallback text and coach chat is disabled");
        }
        let deepgram_api_key = non_empty("DEEPGRAM_API_KEY");
        if deepgram_api_key.is_none() {
            log::warn!("DEEPGRAM_API_KEY not set; voice endpoints are disabled");
        }

        Self {
            gemini_api_key,
            gemini: GeminiConfig {
                model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                api_url: non_empty("GEMINI_API_URL").unwrap_or(defaults.gemini.api_url),
            },
            deepgram_api_key,
            deepgram: DeepgramConfig {
                api_url: non_empty("DEEPGRAM_API_URL").unwrap_or(defaults.deepgram.api_url),
            },
            database_path: non_empty("DATABASE_PATH").unwrap_or(defaults.database_path),
            ocr_timeout: parse_or(non_empty("OCR_TIMEOUT_SECS"), "OCR_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.ocr_timeout),
            max_upload_bytes: parse_or(non_empty("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES")
                .unwrap_or(defaults.max_upload_bytes),
            max_concurrent_requests: parse_or(non_empty("MAX_CONCURRENT_REQUESTS"), "MAX_CONCURRENT_REQUESTS")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_concurrent_requests),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Invalid {} value {:?}, using default", key, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert!(config.gemini_api_key.is_none());
        assert!(config.deepgram_api_key.is_none());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.ocr_timeout, Duration::from_secs(10));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "g-key"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("DEEPGRAM_API_KEY", "d-key"),
            ("OCR_TIMEOUT_SECS", "3"),
            ("MAX_CONCURRENT_REQUESTS", "8"),
        ]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.deepgram_api_key.as_deref(), Some("d-key"));
        assert_eq!(config.ocr_timeout, Duration::from_secs(3));
        assert_eq!(config.max_concurrent_requests, 8);
    }

    #[test]
    fn blank_and_invalid_values_fall_back() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "   "),
            ("OCR_TIMEOUT_SECS", "soon"),
            ("MAX_CONCURRENT_REQUESTS", "0"),
        ]);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.ocr_timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent_requests, 64);
    }
}
