//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if required vars are missing.
//! Sensitive values wrapped in secrecy::SecretString to prevent log leaks.

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};

/// Which publishing sink to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    /// Post to the real broadcast endpoint.
    Broadcast,
    /// Write the rendered message to stdout instead.
    DryRun,
}

impl std::str::FromStr for PublishMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "broadcast" => Ok(Self::Broadcast),
            "dry-run" => Ok(Self::DryRun),
            other => Err(Error::Config(format!(
                "PUBLISH_MODE must be 'broadcast' or 'dry-run', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub db_user: String,
    pub db_password: SecretString,
    pub db_host: String,
    pub db_name: String,
    pub publish_mode: PublishMode,
    /// Endpoint the broadcast sink posts to. Required in broadcast mode.
    pub broadcast_url: Option<String>,
    /// Bearer token for the broadcast endpoint. Required in broadcast mode.
    pub broadcast_token: Option<SecretString>,
    /// Optional token for the identity directory (raises rate limits).
    pub github_token: Option<SecretString>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    /// In production, the scheduler's unit file provides the vars.
    pub fn from_env() -> Result<Self> {
        let publish_mode: PublishMode = std::env::var("PUBLISH_MODE")
            .unwrap_or_else(|_| "dry-run".to_string())
            .parse()?;

        let broadcast_url = std::env::var("BROADCAST_URL").ok();
        let broadcast_token = std::env::var("BROADCAST_TOKEN").ok().map(SecretString::from);

        if publish_mode == PublishMode::Broadcast {
            if broadcast_url.is_none() {
                return Err(Error::Config(
                    "BROADCAST_URL is required when PUBLISH_MODE=broadcast".to_string(),
                ));
            }
            if broadcast_token.is_none() {
                return Err(Error::Config(
                    "BROADCAST_TOKEN is required when PUBLISH_MODE=broadcast".to_string(),
                ));
            }
        }

        Ok(Self {
            db_user: required_var("DB_USER")?,
            db_password: SecretString::from(required_var("DB_PASSWORD")?),
            db_host: required_var("DB_HOST")?,
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "commitcast".to_string()),
            publish_mode,
            broadcast_url,
            broadcast_token,
            github_token: std::env::var("GITHUB_TOKEN").ok().map(SecretString::from),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Assemble the Postgres connection URL from the individual parts.
    pub fn database_url(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}/{}",
            self.db_user,
            self.db_password.expose_secret(),
            self.db_host,
            self.db_name
        ))
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("required environment variable {name} is not set")))
}
