//! Domain-specific error types and error handling.

mod types;


pub use types::{SpamCheckError, VerificationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl DomainError {
    /// Whether the error should be reported to the caller as a 4xx-class rejection
    pub fn is_client_error(&self) -> bool {
        match self {
            DomainError::Validation { .. }
            | DomainError::NotFound { .. }
            | DomainError::Unauthorized => true,
            DomainError::Internal { .. } => false,
            DomainError::Verification(e) => e.is_client_error(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
