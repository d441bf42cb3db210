//! Verification code entity issued under a [`VerificationPolicy`].

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verification_policy::{CodeType, VerificationPolicy};

/// Outcome of checking a submitted code against a stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Code matched
    Accepted,
    /// Code did not match; attempts remain
    Rejected { remaining_attempts: u32 },
    /// Code did not match and the retry budget is now spent
    Exhausted,
    /// Code expired before this attempt
    Expired,
    /// Code was already consumed or its budget spent by earlier attempts
    Invalidated,
}

/// A numeric code issued to one recipient for one flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Unique identifier for the verification code
    pub id: Uuid,

    /// Flow the code was issued for
    pub code_type: CodeType,

    /// Email address or phone number the code was sent to
    pub recipient: String,

    /// The numeric code
    pub code: String,

    /// Number of failed verification attempts made
    pub attempts: u32,

    /// Failed attempts tolerated before the code is invalidated
    pub max_attempts: u32,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully used
    pub is_used: bool,
}

impl VerificationCode {
    /// Issue a fresh code for `recipient` following `policy`
    pub fn issue(policy: &VerificationPolicy, recipient: impl Into<String>) -> Self {
        Self::issue_at(policy, recipient, Utc::now())
    }

    /// Issue a fresh code with an explicit issuance time
    pub fn issue_at(
        policy: &VerificationPolicy,
        recipient: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            code_type: policy.code_type,
            recipient: recipient.into(),
            code: Self::generate_code(policy.digits),
            attempts: 0,
            max_attempts: policy.max_retries,
            created_at: now,
            expires_at: now + policy.expiry(),
            is_used: false,
        }
    }

    /// Generate a random numeric code of `digits` length using the OS CSPRNG
    ///
    /// Leading zeros are preserved, so every code has exactly `digits` characters.
    pub fn generate_code(digits: u8) -> String {
        let digits = digits.clamp(1, 9) as u32;
        let upper = 10u32.pow(digits);
        let code: u32 = OsRng.gen_range(0..upper);
        format!("{:0width$}", code, width = digits as usize)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// A code is valid while it is unexpired, unused and within its retry budget
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.is_used && self.attempts < self.max_attempts
    }

    /// Number of failed attempts still tolerated (0 if exhausted)
    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    pub fn mark_as_used(&mut self) {
        self.is_used = true;
    }

    /// Why the code can no longer be checked at `now`, if it cannot
    ///
    /// Returns `Invalidated` for a consumed code or a spent retry budget and
    /// `Expired` past `expires_at`.
    pub fn unavailable_at(&self, now: DateTime<Utc>) -> Option<CodeCheck> {
        if self.is_used || self.attempts >= self.max_attempts {
            Some(CodeCheck::Invalidated)
        } else if self.is_expired_at(now) {
            Some(CodeCheck::Expired)
        } else {
            None
        }
    }

    /// Constant-time comparison of `input` with the code
    pub fn matches(&self, input: &str) -> bool {
        self.code.len() == input.len() && constant_time_eq(self.code.as_bytes(), input.as_bytes())
    }

    /// Evaluate `input` as attempt number `attempt` (1-based)
    ///
    /// The attempt number must already be reserved in the store, so that
    /// concurrent submissions each see a distinct number. An attempt beyond
    /// the retry budget is refused even when the code matches.
    pub fn evaluate(&self, attempt: u32, input: &str) -> CodeCheck {
        if attempt == 0 || attempt > self.max_attempts {
            return CodeCheck::Invalidated;
        }
        if self.matches(input) {
            return CodeCheck::Accepted;
        }
        match self.max_attempts - attempt {
            0 => CodeCheck::Exhausted,
            remaining_attempts => CodeCheck::Rejected { remaining_attempts },
        }
    }
}
