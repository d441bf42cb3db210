//! Error types for the verification code flow and the spam-check seam

use thiserror::Error;

/// Verification code issuance and validation errors
///
/// Every variant except `DeliveryFailed` and `Storage` is a rejection of the
/// request itself and maps to a 4xx-class response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Unknown verification code type: {code_type}")]
    UnknownCodeType { code_type: String },

    #[error("Invalid recipient for {channel} delivery")]
    InvalidRecipient { channel: String },

    #[error("Authentication required for this verification code type")]
    AuthenticationRequired,

    #[error("No account is registered with this recipient")]
    UserNotFound,

    #[error("An account is already registered with this recipient")]
    UserAlreadyExists,

    #[error("Please wait {retry_after_seconds} seconds before requesting a new code")]
    RateLimited { retry_after_seconds: i64 },

    #[error("No pending verification code")]
    CodeNotFound,

    #[error("Verification code expired")]
    CodeExpired,

    #[error("Maximum verification attempts exceeded")]
    MaxAttemptsExceeded,

    #[error("Failed to deliver verification code: {reason}")]
    DeliveryFailed { reason: String },

    #[error("Verification code storage failure: {reason}")]
    Storage { reason: String },
}

impl VerificationError {
    /// Stable machine-readable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::UnknownCodeType { .. } => "INVALID_CODE_TYPE",
            VerificationError::InvalidRecipient { .. } => "INVALID_RECIPIENT",
            VerificationError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            VerificationError::UserNotFound => "USER_NOT_FOUND",
            VerificationError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            VerificationError::RateLimited { .. } => "RATE_LIMITED",
            VerificationError::CodeNotFound => "CODE_NOT_FOUND",
            VerificationError::CodeExpired => "CODE_EXPIRED",
            VerificationError::MaxAttemptsExceeded => "MAX_ATTEMPTS_EXCEEDED",
            VerificationError::DeliveryFailed { .. } => "DELIVERY_FAILED",
            VerificationError::Storage { .. } => "STORAGE_FAILURE",
        }
    }

    /// Whether the error is caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            VerificationError::DeliveryFailed { .. } | VerificationError::Storage { .. }
        )
    }
}

/// Failures talking to the reputation service
///
/// These never escape the spam checker; they are folded into
/// `SpamCheckResult::error`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpamCheckError {
    #[error("reputation service timed out: {0}")]
    Timeout(String),

    #[error("reputation service unreachable: {0}")]
    Unreachable(String),

    #[error("reputation service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed reputation response: {0}")]
    MalformedResponse(String),

    #[error("reputation service reported failure: {0}")]
    Unsuccessful(String),
}
