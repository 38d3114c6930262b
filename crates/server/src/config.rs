//! Environment-driven configuration.

use secrecy::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Shared secret for the cron trigger. Absent means the trigger runs
    /// unauthenticated (beta posture); a warning is logged on every use.
    pub cron_secret: Option<SecretString>,
    pub anthropic_api_key: SecretString,
    pub claude_model: Option<String>,
    /// Web-push relay endpoint. Absent disables device delivery.
    pub push_relay_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("HOST", "127.0.0.1");
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar("PORT", e.to_string()))?,
            Err(_) => 8080,
        };

        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingVar("ANTHROPIC_API_KEY"))?;

        Ok(Self {
            host,
            port,
            database_url: env_or("DATABASE_URL", "sqlite://community.db"),
            cron_secret: std::env::var("CRON_SECRET").ok().map(SecretString::from),
            anthropic_api_key,
            claude_model: std::env::var("CLAUDE_MODEL").ok(),
            push_relay_url: std::env::var("PUSH_RELAY_URL").ok(),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
