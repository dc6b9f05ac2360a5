//! Backend connection settings, read from the environment.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const ENV_API_URL: &str = "PRICEBOOK_API_URL";
pub const ENV_API_TOKEN: &str = "PRICEBOOK_API_TOKEN";
pub const ENV_API_TIMEOUT_SECS: &str = "PRICEBOOK_API_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the ERP backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Scheme, host and port, e.g. `http://localhost:8000`. Resource paths start with `/api/`.
    pub base_url: String,
    /// Bearer token to start the session with.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingRequired(ENV_API_URL))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: ENV_API_URL,
                value: base_url,
            });
        }

        let timeout_secs = match lookup(ENV_API_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_API_TIMEOUT_SECS,
                value: raw,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mut config = Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs));
        config.token = lookup(ENV_API_TOKEN).filter(|t| !t.is_empty());
        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}
