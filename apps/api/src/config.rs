use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_TEMPLATE_S3_KEY: &str = "templates/letterhead.png";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Object key of the letterhead image in `s3_bucket`.
    pub template_s3_key: String,
    /// Local letterhead image; overrides S3 when set.
    pub template_path: Option<String>,
    pub llm_min_interval: Duration,
    pub preview_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080u16).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            template_s3_key: std::env::var("TEMPLATE_S3_KEY")
                .unwrap_or_else(|_| DEFAULT_TEMPLATE_S3_KEY.to_string()),
            template_path: std::env::var("TEMPLATE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            llm_min_interval: Duration::from_millis(
                parse_env("LLM_MIN_INTERVAL_MS", 1000u64)
                    .context("LLM_MIN_INTERVAL_MS must be a number of milliseconds")?,
            ),
            preview_ttl: Duration::from_secs(
                parse_env("PREVIEW_TTL_SECS", 900u64)
                    .context("PREVIEW_TTL_SECS must be a number of seconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
