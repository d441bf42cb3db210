//! Main verification service implementation

use chrono::Utc;
use std::sync::Arc;

use nb_shared::email::{is_valid_email, mask_email, normalize_email};
use nb_shared::phone::{is_valid_phone_number, mask_phone_number, normalize_phone_number};

use crate::domain::entities::verification_code::{CodeCheck, VerificationCode};
use crate::domain::entities::verification_policy::{
    Channel, CodeType, UserValidation, VerificationPolicy,
};
use crate::errors::{DomainError, DomainResult, VerificationError};

use super::config::VerificationServiceConfig;
use super::template;
use super::traits::{CodeSender, CodeStore, UserDirectory};
use super::types::{RequestContext, SendCodeResult, VerifyCodeResult};

/// Verification service issuing and checking codes according to the policy table
pub struct VerificationService<S: CodeSender, C: CodeStore, U: UserDirectory> {
    /// Email/SMS delivery
    sender: Arc<S>,
    /// Pending code storage
    store: Arc<C>,
    /// Account lookups for user-existence pre-conditions
    users: Arc<U>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<S: CodeSender, C: CodeStore, U: UserDirectory> VerificationService<S, C, U> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `sender` - Delivery implementation for both channels
    /// * `store` - Pending code storage
    /// * `users` - Account directory
    /// * `config` - Service configuration
    pub fn new(
        sender: Arc<S>,
        store: Arc<C>,
        users: Arc<U>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            sender,
            store,
            users,
            config,
        }
    }

    /// Issue a verification code
    ///
    /// This method:
    /// 1. Resolves the policy for `code_type` (unknown types are rejected)
    /// 2. Enforces the policy's authentication requirement
    /// 3. Validates the recipient for the policy's channel
    /// 4. Enforces the resend cooldown
    /// 5. Checks the user-existence pre-condition
    /// 6. Generates, stores and delivers the code
    ///
    /// # Returns
    ///
    /// * `Ok(SendCodeResult)` - The issued code and delivery details
    /// * `Err(DomainError)` - If any check fails or delivery fails
    pub async fn request_code(
        &self,
        code_type: &str,
        recipient: &str,
        ctx: &RequestContext,
    ) -> DomainResult<SendCodeResult> {
        let policy = resolve_policy(code_type)?;
        let masked = mask_recipient(policy.channel, recipient);

        if policy.require_auth && !ctx.is_authenticated() {
            tracing::warn!(
                code_type = %policy.code_type,
                recipient = %masked,
                event = "auth_required",
                "Unauthenticated request for session-bound verification code"
            );
            return Err(VerificationError::AuthenticationRequired.into());
        }

        let recipient = normalize_recipient(policy.channel, recipient)?;

        let now = Utc::now();
        if let Some(last) = self
            .store
            .last_issued_at(policy.code_type, &recipient)
            .await
            .map_err(storage_error)?
        {
            let ready_at = last + policy.rate_limit();
            if ready_at > now {
                let retry_after_seconds = (ready_at - now).num_seconds().max(1);
                tracing::warn!(
                    code_type = %policy.code_type,
                    recipient = %masked,
                    retry_after_seconds,
                    event = "rate_limit_exceeded",
                    "Verification code request rate limit exceeded"
                );
                return Err(VerificationError::RateLimited { retry_after_seconds }.into());
            }
        }

        self.check_user_validation(policy, &recipient).await?;

        let verification_code = VerificationCode::issue_at(policy, recipient.clone(), now);
        self.store
            .save(&verification_code)
            .await
            .map_err(|e| {
                tracing::error!(
                    recipient = %masked,
                    error = %e,
                    event = "otp_storage_failed",
                    "Failed to store verification code"
                );
                storage_error(e)
            })?;

        tracing::info!(
            code_type = %policy.code_type,
            recipient = %masked,
            session_id = %verification_code.id,
            user_id = ctx.user_id.as_deref().unwrap_or("-"),
            ip = ctx.ip.as_deref().unwrap_or("-"),
            event = "otp_generated",
            "Generated new verification code"
        );

        let message = template::render(policy, &self.config.site_name, &verification_code.code);
        let message_id = match self
            .sender
            .send_code(policy.channel, &recipient, &message)
            .await
        {
            Ok(id) => id,
            Err(reason) => {
                tracing::error!(
                    recipient = %masked,
                    channel = %policy.channel,
                    error = %reason,
                    event = "otp_delivery_failed",
                    "Failed to deliver verification code"
                );
                // The cooldown mark stays so a failing provider is not hammered
                self.discard(&verification_code, &masked).await;
                return Err(VerificationError::DeliveryFailed { reason }.into());
            }
        };

        Ok(SendCodeResult {
            next_resend_at: now + policy.rate_limit(),
            verification_code,
            message_id,
        })
    }

    /// Verify a submitted code
    ///
    /// Malformed input (wrong length or non-digits) is rejected without
    /// consuming an attempt. Every well-formed submission reserves an attempt
    /// in the store before the comparison, so concurrent guesses cannot
    /// exceed the policy's retry budget. A matching code is consumed by id;
    /// only one concurrent submission can win it.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyCodeResult)` - Verification outcome with remaining attempts
    /// * `Err(DomainError)` - Unknown type, missing/expired/exhausted code, or storage failure
    pub async fn verify_code(
        &self,
        code_type: &str,
        recipient: &str,
        code: &str,
    ) -> DomainResult<VerifyCodeResult> {
        let policy = resolve_policy(code_type)?;
        let masked = mask_recipient(policy.channel, recipient);
        let recipient = normalize_recipient(policy.channel, recipient)?;

        if code.len() != policy.digits as usize || !code.chars().all(|c| c.is_ascii_digit()) {
            tracing::warn!(
                recipient = %masked,
                event = "invalid_code_format",
                code_length = code.len(),
                "Invalid verification code format provided"
            );
            return Ok(VerifyCodeResult::rejected(None, "Invalid verification code format"));
        }

        let stored = self
            .store
            .load(policy.code_type, &recipient)
            .await
            .map_err(storage_error)?
            .ok_or(VerificationError::CodeNotFound)?;

        if let Some(reason) = stored.unavailable_at(Utc::now()) {
            self.discard(&stored, &masked).await;
            return Err(match reason {
                CodeCheck::Expired => VerificationError::CodeExpired,
                _ => VerificationError::CodeNotFound,
            }
            .into());
        }

        let attempt = self
            .store
            .record_attempt(policy.code_type, &recipient, stored.id)
            .await
            .map_err(storage_error)?
            .ok_or(VerificationError::CodeNotFound)?;

        match stored.evaluate(attempt, code) {
            CodeCheck::Accepted => {
                let consumed = self
                    .store
                    .consume(policy.code_type, &recipient, stored.id)
                    .await
                    .map_err(storage_error)?;
                if !consumed {
                    return Err(VerificationError::CodeNotFound.into());
                }
                tracing::info!(
                    code_type = %policy.code_type,
                    recipient = %masked,
                    attempt,
                    event = "otp_verified_success",
                    "Verification code successfully verified"
                );
                Ok(VerifyCodeResult::verified())
            }
            CodeCheck::Rejected { remaining_attempts } => {
                tracing::warn!(
                    recipient = %masked,
                    remaining_attempts,
                    event = "otp_verification_failed",
                    "Verification code verification failed"
                );
                Ok(VerifyCodeResult::rejected(
                    Some(remaining_attempts),
                    format!(
                        "Invalid verification code. {} attempts remaining",
                        remaining_attempts
                    ),
                ))
            }
            CodeCheck::Exhausted | CodeCheck::Invalidated => {
                self.discard(&stored, &masked).await;
                tracing::error!(
                    recipient = %masked,
                    attempt,
                    event = "max_attempts_exceeded",
                    "Maximum verification attempts exceeded"
                );
                Err(VerificationError::MaxAttemptsExceeded.into())
            }
            CodeCheck::Expired => {
                self.discard(&stored, &masked).await;
                Err(VerificationError::CodeExpired.into())
            }
        }
    }

    /// Drop any pending code for (code type, recipient)
    pub async fn clear_verification(&self, code_type: CodeType, recipient: &str) -> DomainResult<()> {
        let recipient = normalize_recipient(code_type.policy().channel, recipient)?;
        self.store
            .remove(code_type, &recipient)
            .await
            .map_err(storage_error)
    }

    /// Best-effort removal of one issued code; failures are logged only
    async fn discard(&self, code: &VerificationCode, masked: &str) {
        if let Err(e) = self.store.consume(code.code_type, &code.recipient, code.id).await {
            tracing::warn!(
                code_type = %code.code_type,
                recipient = %masked,
                error = %e,
                event = "otp_cleanup_failed",
                "Failed to remove verification code"
            );
        }
    }

    async fn check_user_validation(
        &self,
        policy: &VerificationPolicy,
        recipient: &str,
    ) -> DomainResult<()> {
        let Some(rule) = policy.user_validation else {
            return Ok(());
        };

        let exists = self
            .users
            .recipient_exists(policy.channel, recipient)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to look up recipient: {}", e),
            })?;

        match (rule, exists) {
            (UserValidation::MustExist, false) => Err(VerificationError::UserNotFound.into()),
            (UserValidation::MustNotExist, true) => Err(VerificationError::UserAlreadyExists.into()),
            _ => Ok(()),
        }
    }
}

fn resolve_policy(code_type: &str) -> DomainResult<&'static VerificationPolicy> {
    let code_type: CodeType = code_type.parse().map_err(|e| {
        tracing::warn!(error = %e, event = "unknown_code_type", "Rejected verification request");
        DomainError::from(e)
    })?;
    Ok(code_type.policy())
}

/// Validate and normalize a recipient for `channel`
pub fn normalize_recipient(channel: Channel, recipient: &str) -> Result<String, VerificationError> {
    let valid = match channel {
        Channel::Email => is_valid_email(recipient),
        Channel::Sms => is_valid_phone_number(recipient),
    };
    if !valid {
        return Err(VerificationError::InvalidRecipient {
            channel: channel.to_string(),
        });
    }

    Ok(match channel {
        Channel::Email => normalize_email(recipient),
        Channel::Sms => normalize_phone_number(recipient),
    })
}

/// Mask a recipient for log output
pub fn mask_recipient(channel: Channel, recipient: &str) -> String {
    match channel {
        Channel::Email => mask_email(recipient),
        Channel::Sms => mask_phone_number(recipient),
    }
}

fn storage_error(reason: String) -> DomainError {
    VerificationError::Storage { reason }.into()
}
