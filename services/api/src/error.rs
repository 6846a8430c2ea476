//! services/api/src/error.rs
//!
//! Defines the primary error type for the `api` service binaries.

use crate::config::ConfigError;
use achameupet_core::ServiceError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the core services.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Represents a standard Input/Output error (e.g., binding to a network
    /// socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
