//! Gateway configuration.
//!
//! ## Environment Variables
//! - `PAWLOG_GEMINI_API_KEY`: API credential. Without it every gateway call
//!   returns its fallback payload.
//! - `PAWLOG_GEMINI_MODEL`: model name (default `gemini-1.5-flash`)
//! - `PAWLOG_GEMINI_BASE_URL`: API base URL
//! - `PAWLOG_AI_TIMEOUT_SECS`: request timeout in seconds (default 60)

use std::time::Duration;

use tracing::warn;

pub const API_KEY_ENV: &str = "PAWLOG_GEMINI_API_KEY";
pub const MODEL_ENV: &str = "PAWLOG_GEMINI_MODEL";
pub const BASE_URL_ENV: &str = "PAWLOG_GEMINI_BASE_URL";
pub const TIMEOUT_ENV: &str = "PAWLOG_AI_TIMEOUT_SECS";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Load from process environment. Missing or blank values use defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        let timeout = match non_blank(TIMEOUT_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %raw, "invalid {}, using default", TIMEOUT_ENV);
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            api_key: non_blank(API_KEY_ENV),
            model: non_blank(MODEL_ENV).unwrap_or(defaults.model),
            base_url: non_blank(BASE_URL_ENV).unwrap_or(defaults.base_url),
            timeout,
        }
    }

    /// Whether live calls can be attempted.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
