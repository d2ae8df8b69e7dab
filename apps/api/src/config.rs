//! API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, multi-line
    Pretty,
    /// One JSON object per line
    Json,
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen address
    pub http_addr: SocketAddr,

    /// SQLite database file
    pub database_path: String,

    /// Upper bound on pooled connections
    pub db_max_connections: u32,

    /// Budget for a single service call, in milliseconds
    pub request_timeout_ms: u64,

    /// Log output format
    pub log_format: LogFormat,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_addr: lookup("HTTP_ADDR")
                .unwrap_or_else(|| "0.0.0.0:8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_ADDR".to_string()))?,

            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| "./hotcoffee.db".to_string()),

            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            request_timeout_ms: lookup("REQUEST_TIMEOUT_MS")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("REQUEST_TIMEOUT_MS".to_string()))?,

            log_format: match lookup("LOG_FORMAT").as_deref() {
                None | Some("pretty") => LogFormat::Pretty,
                Some("json") => LogFormat::Json,
                Some(_) => return Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
            },
        };

        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_PATH".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("REQUEST_TIMEOUT_MS".to_string()));
        }

        Ok(config)
    }

    /// Per-call service timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_path: "./hotcoffee.db".to_string(),
            db_max_connections: 5,
            request_timeout_ms: 3000,
            log_format: LogFormat::Pretty,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
