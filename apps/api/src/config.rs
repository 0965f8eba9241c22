use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
///
/// Credentials are optional: a missing one is logged at start-up and the
/// operations that need it report "not connected" / "not configured" instead
/// of the process exiting.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_username: Option<String>,
    pub mongodb_password: Option<String>,
    pub mongodb_cluster_host: String,
    pub mongodb_database: String,
    pub mongodb_collection: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    /// Number of recent submissions fed to the LLM per question.
    pub context_record_limit: usize,
    /// Upper bound on a per-request `limit` override.
    pub max_context_records: usize,
    /// Idle time after which an untouched form session is dropped.
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            mongodb_username: optional_env("MONGODB_USERNAME"),
            mongodb_password: optional_env("MONGODB_PASSWORD"),
            mongodb_cluster_host: env_or("MONGODB_CLUSTER_HOST", "cluster0.mongodb.net"),
            mongodb_database: env_or("MONGODB_DATABASE", "succession_ai"),
            mongodb_collection: env_or("MONGODB_COLLECTION", "business_data"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            context_record_limit: env_or("CONTEXT_RECORD_LIMIT", "5")
                .parse::<usize>()
                .context("CONTEXT_RECORD_LIMIT must be a non-negative integer")?,
            max_context_records: env_or("MAX_CONTEXT_RECORDS", "50")
                .parse::<usize>()
                .context("MAX_CONTEXT_RECORDS must be a non-negative integer")?,
            session_ttl: env_or("SESSION_TTL_SECS", "3600")
                .parse::<u64>()
                .map(Duration::from_secs)
                .context("SESSION_TTL_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Username and password, if both are present.
    pub fn mongodb_credentials(&self) -> Option<(&str, &str)> {
        Some((
            self.mongodb_username.as_deref()?,
            self.mongodb_password.as_deref()?,
        ))
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
