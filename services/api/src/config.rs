//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Managed-platform project that owns the document database and the
    /// identity accounts.
    pub project_id: String,
    /// Object-storage bucket for listing photos.
    pub storage_bucket: String,
    /// Browser API key used by the identity-toolkit endpoints.
    pub identity_api_key: String,
    /// OAuth bearer token for the server-side platform APIs. Optional so the
    /// service can run against local emulators without credentials.
    pub platform_token: Option<String>,
    /// Exact origin allowed by CORS; any origin is allowed when unset.
    pub frontend_origin: Option<String>,
    /// Development mode includes collaborator error detail in responses.
    pub dev_mode: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for
    /// development, but this is skipped in test environments to ensure tests
    /// are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let project_id = std::env::var("PLATFORM_PROJECT_ID")
            .map_err(|_| ConfigError::MissingVar("PLATFORM_PROJECT_ID".to_string()))?;

        let storage_bucket =
            std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| format!("{project_id}.appspot.com"));

        let identity_api_key = std::env::var("IDENTITY_API_KEY")
            .map_err(|_| ConfigError::MissingVar("IDENTITY_API_KEY".to_string()))?;

        let platform_token = std::env::var("PLATFORM_TOKEN").ok();
        let frontend_origin = std::env::var("FRONTEND_URL").ok();

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let dev_mode = app_env != "production";

        Ok(Self {
            bind_address,
            log_level,
            project_id,
            storage_bucket,
            identity_api_key,
            platform_token,
            frontend_origin,
            dev_mode,
        })
    }
}
