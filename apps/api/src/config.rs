use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Upper bound on retries per rule group; every retry is a billable request.
pub const MAX_GROUP_RETRIES: u32 = 10;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub group_max_retries: u32,
    pub attempt_timeout_secs: u64,
    pub retry_backoff_ms: u64,
    pub prompt_price_per_mtok: f64,
    pub completion_price_per_mtok: f64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1".to_string())?,
            model: env_or("OPENAI_MODEL", "gpt-4o".to_string())?,
            group_max_retries: at_most(
                "GROUP_MAX_RETRIES",
                env_or("GROUP_MAX_RETRIES", 2)?,
                MAX_GROUP_RETRIES,
            )?,
            attempt_timeout_secs: env_or("ATTEMPT_TIMEOUT_SECS", 90)?,
            retry_backoff_ms: env_or("RETRY_BACKOFF_MS", 500)?,
            prompt_price_per_mtok: env_or("PROMPT_PRICE_PER_MTOK", 2.50)?,
            completion_price_per_mtok: env_or("COMPLETION_PRICE_PER_MTOK", 10.00)?,
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            port: env_or("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info".to_string())?,
        })
    }
}

// The API key must never reach logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("group_max_retries", &self.group_max_retries)
            .field("attempt_timeout_secs", &self.attempt_timeout_secs)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("prompt_price_per_mtok", &self.prompt_price_per_mtok)
            .field("completion_price_per_mtok", &self.completion_price_per_mtok)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}

fn at_most(key: &str, value: u32, max: u32) -> Result<u32> {
    if value > max {
        bail!("Environment variable '{key}' must be at most {max}, got {value}");
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        openai_api_key: "sk-test-secret".to_string(),
        openai_base_url: "http://127.0.0.1:9".to_string(),
        model: "test-model".to_string(),
        group_max_retries: 2,
        attempt_timeout_secs: 5,
        retry_backoff_ms: 0,
        prompt_price_per_mtok: 2.50,
        completion_price_per_mtok: 10.00,
        max_upload_bytes: 1024 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}
