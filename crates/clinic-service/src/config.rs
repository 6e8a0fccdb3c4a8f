//! Clinic service configuration.
//!
//! Configuration is loaded from environment variables. The database URL is
//! redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default number of holders per result page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Clinic service configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL. `None` selects the in-memory repository.
    pub database_url: Option<String>,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Holders per page on the search results list (default: 5).
    pub page_size: u32,

    /// Per-request timeout in seconds (default: 30).
    pub request_timeout_seconds: u64,

    /// Seed the in-memory repository with sample records (default: true).
    pub sample_data: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("bind_address", &self.bind_address)
            .field("page_size", &self.page_size)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("sample_data", &self.sample_data)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid page size configuration: {0}")]
    InvalidPageSize(String),

    #[error("Invalid request timeout configuration: {0}")]
    InvalidRequestTimeout(String),

    #[error("Invalid sample data flag: {0}")]
    InvalidSampleData(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .cloned();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let page_size = if let Some(value_str) = vars.get("CLINIC_PAGE_SIZE") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidPageSize(format!(
                    "CLINIC_PAGE_SIZE must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 || value > MAX_PAGE_SIZE {
                return Err(ConfigError::InvalidPageSize(format!(
                    "CLINIC_PAGE_SIZE must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, value
                )));
            }

            value
        } else {
            DEFAULT_PAGE_SIZE
        };

        let request_timeout_seconds =
            if let Some(value_str) = vars.get("REQUEST_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidRequestTimeout(format!(
                        "REQUEST_TIMEOUT_SECONDS must be a valid positive integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidRequestTimeout(
                        "REQUEST_TIMEOUT_SECONDS must be greater than 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_REQUEST_TIMEOUT_SECONDS
            };

        let sample_data = match vars.get("CLINIC_SAMPLE_DATA").map(|s| s.as_str()) {
            None => true,
            Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => {
                return Err(ConfigError::InvalidSampleData(format!(
                    "CLINIC_SAMPLE_DATA must be true or false, got '{}'",
                    other
                )))
            }
        };

        Ok(Config {
            database_url,
            bind_address,
            page_size,
            request_timeout_seconds,
            sample_data,
        })
    }
}
