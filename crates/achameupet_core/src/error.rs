//! crates/achameupet_core/src/error.rs
//!
//! The closed error taxonomy for all service operations. Every outcome class
//! maps to exactly one HTTP status at the API boundary.

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad or missing input. Carries the complete list of violations, not
    /// just the first one.
    #[error("validation error: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Missing or unverifiable credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to touch this record.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Resource already exists (registration with a taken email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Every photo upload failed, so the non-empty-photos invariant cannot
    /// hold and nothing was written.
    #[error("no image was stored successfully")]
    UploadFailure,

    /// A collaborator call failed for reasons other than the above.
    #[error("collaborator error: {0}")]
    Collaborator(String),
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(msg) => Self::NotFound(msg),
            PortError::InvalidToken(msg) => Self::Unauthorized(msg),
            PortError::EmailInUse(msg) => Self::Conflict(msg),
            PortError::Upload(msg) => Self::Collaborator(msg),
            PortError::Unavailable(msg) => Self::Collaborator(msg),
        }
    }
}

/// A specialized Result type for core service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
