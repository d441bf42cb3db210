//! Traits for delivery, storage and user lookup integration

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_code::VerificationCode;
use crate::domain::entities::verification_policy::{Channel, CodeType};

use super::template::RenderedMessage;

/// Delivers a rendered verification message over email or SMS
#[async_trait]
pub trait CodeSender: Send + Sync {
    /// Send a message, returning the provider's message id
    async fn send_code(
        &self,
        channel: Channel,
        recipient: &str,
        message: &RenderedMessage,
    ) -> Result<String, String>;
}

/// Storage for pending codes, keyed by (code type, recipient)
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store a freshly issued code, replacing any pending one, and record the issuance time
    async fn save(&self, code: &VerificationCode) -> Result<(), String>;
    /// Load the pending code
    async fn load(&self, code_type: CodeType, recipient: &str) -> Result<Option<VerificationCode>, String>;
    /// Atomically count one verification attempt against the pending code issued as `id`
    ///
    /// Returns the attempt number after the increment, or `None` when that
    /// code is gone or has been replaced by a newer one.
    async fn record_attempt(&self, code_type: CodeType, recipient: &str, id: Uuid) -> Result<Option<u32>, String>;
    /// Atomically remove the pending code if it is still the one issued as `id`
    ///
    /// Returns whether this call removed it. The issuance time is kept.
    async fn consume(&self, code_type: CodeType, recipient: &str, id: Uuid) -> Result<bool, String>;
    /// Drop the pending code; the issuance time is kept for the resend cooldown
    async fn remove(&self, code_type: CodeType, recipient: &str) -> Result<(), String>;
    /// When a code was last issued to this recipient for this flow
    async fn last_issued_at(&self, code_type: CodeType, recipient: &str) -> Result<Option<DateTime<Utc>>, String>;
}

/// Answers whether an account already owns a contact address
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn recipient_exists(&self, channel: Channel, recipient: &str) -> Result<bool, String>;
}
