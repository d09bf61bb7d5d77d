use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_TEXT_MODEL, DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE};
use crate::resilience::policy::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS};
use crate::resilience::{FailureMode, RetryPolicy};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub admin_key: String,
    pub text_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    /// Overrides every flow's own failure mode when set.
    pub failure_mode: Option<FailureMode>,
    /// Owner profile JSON used for resumes. The bundled example is used when unset.
    pub profile_path: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let failure_mode = match lookup("FAILURE_MODE") {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.parse::<FailureMode>()
                    .map_err(anyhow::Error::msg)
                    .context("FAILURE_MODE must be 'propagate' or 'placeholder'")?,
            ),
            _ => None,
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            gemini_api_key: require("GEMINI_API_KEY")?,
            admin_key: require("ADMIN_KEY")?,
            text_model: or_default("TEXT_MODEL", DEFAULT_TEXT_MODEL),
            tts_model: or_default("TTS_MODEL", DEFAULT_TTS_MODEL),
            tts_voice: or_default("TTS_VOICE", DEFAULT_TTS_VOICE),
            retry_max_attempts: or_default("RETRY_MAX_ATTEMPTS", &DEFAULT_MAX_ATTEMPTS.to_string())
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .context("RETRY_MAX_ATTEMPTS must be a positive integer")?,
            retry_base_delay_ms: or_default("RETRY_BASE_DELAY_MS", &DEFAULT_BASE_DELAY_MS.to_string())
                .parse::<u64>()
                .context("RETRY_BASE_DELAY_MS must be a number of milliseconds")?,
            failure_mode,
            profile_path: lookup("PROFILE_PATH").filter(|p| !p.trim().is_empty()),
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.gemini_api_key.clone(),
            text_model: self.text_model.clone(),
            tts_model: self.tts_model.clone(),
            tts_voice: self.tts_voice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/folio"),
        ("GEMINI_API_KEY", "test-key"),
        ("ADMIN_KEY", "letmein"),
    ];

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.tts_voice, "Algenib");
        assert_eq!(config.failure_mode, None);
        assert_eq!(config.profile_path, None);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_missing_required_var_fails() {
        let err = Config::from_lookup(lookup_from(&REQUIRED[..2])).unwrap_err();
        assert!(err.to_string().contains("ADMIN_KEY"));
    }

    #[test]
    fn test_blank_required_var_fails() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("GEMINI_API_KEY", "   ");
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_retry_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RETRY_MAX_ATTEMPTS", "5"));
        pairs.push(("RETRY_BASE_DELAY_MS", "250"));
        pairs.push(("FAILURE_MODE", "placeholder"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.base_delay(), Duration::from_millis(250));
        assert_eq!(config.failure_mode, Some(FailureMode::Placeholder));
    }

    #[test]
    fn test_invalid_values_fail() {
        for (key, value) in [
            ("PORT", "eighty"),
            ("RETRY_MAX_ATTEMPTS", "-1"),
            ("RETRY_MAX_ATTEMPTS", "0"),
            ("FAILURE_MODE", "sometimes"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((key, value));
            assert!(
                Config::from_lookup(lookup_from(&pairs)).is_err(),
                "{key}={value} should be rejected"
            );
        }
    }
}
