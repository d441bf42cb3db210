//! Types for verification service requests and results

use chrono::{DateTime, Utc};

use crate::domain::entities::verification_code::VerificationCode;

/// Caller context of a code request
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Authenticated user, if the request carries a session
    pub user_id: Option<String>,
    /// Client IP, used for logging only
    pub ip: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ip: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Result of sending a verification code
#[derive(Debug, Clone)]
pub struct SendCodeResult {
    /// The verification code entity that was created
    pub verification_code: VerificationCode,
    /// The message ID from the delivery provider
    pub message_id: String,
    /// When the user can request another code
    pub next_resend_at: DateTime<Utc>,
}

/// Result of verifying a code
#[derive(Debug, Clone)]
pub struct VerifyCodeResult {
    /// Whether the verification was successful
    pub success: bool,
    /// Number of remaining attempts (if verification failed)
    pub remaining_attempts: Option<u32>,
    /// Error message if verification failed
    pub error_message: Option<String>,
}

impl VerifyCodeResult {
    pub fn verified() -> Self {
        Self {
            success: true,
            remaining_attempts: None,
            error_message: None,
        }
    }

    pub fn rejected(remaining_attempts: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            remaining_attempts,
            error_message: Some(message.into()),
        }
    }
}
