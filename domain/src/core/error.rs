//! Domain error types

use crate::permission::PermissionDenied;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Invalid classification pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl DomainError {
    /// Check if this error is a permission denial
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, DomainError::PermissionDenied(_))
    }
}
