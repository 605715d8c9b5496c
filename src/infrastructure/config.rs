//! Application configuration loaded from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use companion_core::infrastructure::AppConfig;
//!
//! let config = AppConfig::from_env()?;
//! println!("API: {}", config.api_base_url);
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const API_BASE_URL: &str = "COMPANION_API_BASE_URL";
pub const TOKEN_STORE_PATH: &str = "COMPANION_TOKEN_STORE_PATH";
pub const REQUEST_TIMEOUT_SECS: &str = "COMPANION_REQUEST_TIMEOUT_SECS";
pub const LOG_FILTER: &str = "COMPANION_LOG_FILTER";
pub const LOG_FORMAT: &str = "COMPANION_LOG_FORMAT";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILTER: &str = "info,companion_core=debug";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the companion backend, without trailing slash.
    pub api_base_url: String,
    /// File backing the token store; tokens are kept in memory when unset.
    pub token_store_path: Option<PathBuf>,
    pub request_timeout: Duration,
    /// `EnvFilter` directives.
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `COMPANION_API_BASE_URL` (required)
    /// - `COMPANION_TOKEN_STORE_PATH` (optional)
    /// - `COMPANION_REQUEST_TIMEOUT_SECS` (optional, default: 10)
    /// - `COMPANION_LOG_FILTER` (optional, default: `info,companion_core=debug`)
    /// - `COMPANION_LOG_FORMAT`: `pretty` or `json` (optional, default: `pretty`)
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingEnvVar`] for a missing required variable and
    /// [`ConfigError::InvalidValue`] for an unparseable one.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(error) = dotenvy::dotenv()
            && !error.not_found()
        {
            tracing::warn!(%error, "ignoring unreadable .env file");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = lookup(API_BASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(API_BASE_URL.to_string()))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::invalid(API_BASE_URL, "must be an http(s) URL"));
        }

        let token_store_path = lookup(TOKEN_STORE_PATH)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let request_timeout = match lookup(REQUEST_TIMEOUT_SECS) {
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::invalid(REQUEST_TIMEOUT_SECS, "must be positive"));
                }
                Ok(seconds) => Duration::from_secs(seconds),
                Err(error) => {
                    return Err(ConfigError::invalid(REQUEST_TIMEOUT_SECS, error.to_string()));
                }
            },
        };

        let log_filter = lookup(LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_format = match lookup(LOG_FORMAT).as_deref().map(str::trim) {
            None | Some("" | "pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::invalid(
                    LOG_FORMAT,
                    format!("expected `pretty` or `json`, got `{other}`"),
                ));
            }
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token_store_path,
            request_timeout,
            log_filter,
            log_format,
        })
    }
}
