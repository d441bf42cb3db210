//! Verification code policy table.
//!
//! Every verification flow in NodeBBS (registration, login, password reset,
//! contact binding, sensitive operations...) is identified by a [`CodeType`].
//! Each code type maps to exactly one immutable [`VerificationPolicy`] that
//! fixes the delivery channel, code length, expiry, retry budget, resend
//! cooldown, authentication requirement and user-existence pre-condition.
//!
//! Policies are spelled out one by one, not derived from each other.
//! Lookups of unknown code types return `None`; there is no fallback policy.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::VerificationError;

/// Delivery medium for a verification code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-condition on whether an account already owns the recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserValidation {
    /// The recipient must belong to an existing account (login, reset...)
    MustExist,
    /// The recipient must not belong to any account (register, bind...)
    MustNotExist,
}

/// Verification code use case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeType {
    EmailRegister,
    EmailLogin,
    EmailPasswordReset,
    EmailVerify,
    EmailBind,
    EmailChange,
    PhoneRegister,
    PhoneLogin,
    PhonePasswordReset,
    PhoneVerify,
    PhoneBind,
    // Single step: the old number is not re-verified before switching.
    PhoneChange,
    SensitiveOperation,
}

impl CodeType {
    /// Every enumerated code type, in table order
    pub const ALL: [CodeType; 13] = [
        CodeType::EmailRegister,
        CodeType::EmailLogin,
        CodeType::EmailPasswordReset,
        CodeType::EmailVerify,
        CodeType::EmailBind,
        CodeType::EmailChange,
        CodeType::PhoneRegister,
        CodeType::PhoneLogin,
        CodeType::PhonePasswordReset,
        CodeType::PhoneVerify,
        CodeType::PhoneBind,
        CodeType::PhoneChange,
        CodeType::SensitiveOperation,
    ];

    /// Wire name of the code type (e.g. `"email_register"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::EmailRegister => "email_register",
            CodeType::EmailLogin => "email_login",
            CodeType::EmailPasswordReset => "email_password_reset",
            CodeType::EmailVerify => "email_verify",
            CodeType::EmailBind => "email_bind",
            CodeType::EmailChange => "email_change",
            CodeType::PhoneRegister => "phone_register",
            CodeType::PhoneLogin => "phone_login",
            CodeType::PhonePasswordReset => "phone_password_reset",
            CodeType::PhoneVerify => "phone_verify",
            CodeType::PhoneBind => "phone_bind",
            CodeType::PhoneChange => "phone_change",
            CodeType::SensitiveOperation => "sensitive_operation",
        }
    }

    /// The policy governing this code type
    pub fn policy(&self) -> &'static VerificationPolicy {
        match self {
            CodeType::EmailRegister => &EMAIL_REGISTER,
            CodeType::EmailLogin => &EMAIL_LOGIN,
            CodeType::EmailPasswordReset => &EMAIL_PASSWORD_RESET,
            CodeType::EmailVerify => &EMAIL_VERIFY,
            CodeType::EmailBind => &EMAIL_BIND,
            CodeType::EmailChange => &EMAIL_CHANGE,
            CodeType::PhoneRegister => &PHONE_REGISTER,
            CodeType::PhoneLogin => &PHONE_LOGIN,
            CodeType::PhonePasswordReset => &PHONE_PASSWORD_RESET,
            CodeType::PhoneVerify => &PHONE_VERIFY,
            CodeType::PhoneBind => &PHONE_BIND,
            CodeType::PhoneChange => &PHONE_CHANGE,
            CodeType::SensitiveOperation => &SENSITIVE_OPERATION,
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeType {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeType::ALL
            .iter()
            .copied()
            .find(|code_type| code_type.as_str() == s)
            .ok_or_else(|| VerificationError::UnknownCodeType {
                code_type: s.to_string(),
            })
    }
}

/// Fixed parameters governing one verification code use case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationPolicy {
    pub code_type: CodeType,
    pub channel: Channel,
    /// Length of the generated numeric code
    pub digits: u8,
    /// Minutes after issuance at which the code stops being accepted
    pub expiry_minutes: u32,
    /// Whether an authenticated session is required to request the code
    pub require_auth: bool,
    /// Ownership pre-condition checked before issuance; `None` leaves it to the caller
    pub user_validation: Option<UserValidation>,
    /// Failed verification attempts tolerated before the code is invalidated
    pub max_retries: u32,
    /// Minimum interval between two issuances to the same recipient
    pub rate_limit_seconds: u32,
    /// Message template identifier used by the sender
    pub template: &'static str,
}

impl VerificationPolicy {
    pub fn expiry(&self) -> Duration {
        Duration::minutes(i64::from(self.expiry_minutes))
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::seconds(i64::from(self.rate_limit_seconds))
    }
}

/// Standard code length for every flow
pub const CODE_DIGITS: u8 = 6;

/// Standard retry budget
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Standard resend cooldown in seconds
pub const DEFAULT_RATE_LIMIT_SECONDS: u32 = 60;

static EMAIL_REGISTER: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::EmailRegister,
    channel: Channel::Email,
    digits: CODE_DIGITS,
    expiry_minutes: 10,
    require_auth: false,
    user_validation: Some(UserValidation::MustNotExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "email_register",
};

static EMAIL_LOGIN: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::EmailLogin,
    channel: Channel::Email,
    digits: CODE_DIGITS,
    expiry_minutes: 5,
    require_auth: false,
    user_validation: Some(UserValidation::MustExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "email_login",
};

static EMAIL_PASSWORD_RESET: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::EmailPasswordReset,
    channel: Channel::Email,
    digits: CODE_DIGITS,
    expiry_minutes: 15,
    require_auth: false,
    user_validation: Some(UserValidation::MustExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "email_password_reset",
};

static EMAIL_VERIFY: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::EmailVerify,
    channel: Channel::Email,
    digits: CODE_DIGITS,
    expiry_minutes: 30,
    require_auth: true,
    user_validation: None,
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "email_verify",
};

static EMAIL_BIND: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::EmailBind,
    channel: Channel::Email,
    digits: CODE_DIGITS,
    expiry_minutes: 10,
    require_auth: true,
    user_validation: Some(UserValidation::MustNotExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "email_bind",
};

static EMAIL_CHANGE: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::EmailChange,
    channel: Channel::Email,
    digits: CODE_DIGITS,
    expiry_minutes: 10,
    require_auth: true,
    user_validation: Some(UserValidation::MustExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "email_change",
};

static PHONE_REGISTER: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::PhoneRegister,
    channel: Channel::Sms,
    digits: CODE_DIGITS,
    expiry_minutes: 10,
    require_auth: false,
    user_validation: Some(UserValidation::MustNotExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "sms_register",
};

static PHONE_LOGIN: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::PhoneLogin,
    channel: Channel::Sms,
    digits: CODE_DIGITS,
    expiry_minutes: 5,
    require_auth: false,
    user_validation: Some(UserValidation::MustExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "sms_login",
};

static PHONE_PASSWORD_RESET: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::PhonePasswordReset,
    channel: Channel::Sms,
    digits: CODE_DIGITS,
    expiry_minutes: 15,
    require_auth: false,
    user_validation: Some(UserValidation::MustExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "sms_password_reset",
};

static PHONE_VERIFY: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::PhoneVerify,
    channel: Channel::Sms,
    digits: CODE_DIGITS,
    expiry_minutes: 10,
    require_auth: true,
    user_validation: None,
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "sms_verify",
};

static PHONE_BIND: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::PhoneBind,
    channel: Channel::Sms,
    digits: CODE_DIGITS,
    expiry_minutes: 10,
    require_auth: true,
    user_validation: Some(UserValidation::MustNotExist),
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "sms_bind",
};

static PHONE_CHANGE: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::PhoneChange,
    channel: Channel::Sms,
    digits: CODE_DIGITS,
    expiry_minutes: 10,
    require_auth: true,
    user_validation: None,
    max_retries: DEFAULT_MAX_RETRIES,
    rate_limit_seconds: DEFAULT_RATE_LIMIT_SECONDS,
    template: "sms_change",
};

static SENSITIVE_OPERATION: VerificationPolicy = VerificationPolicy {
    code_type: CodeType::SensitiveOperation,
    channel: Channel::Email,
    digits: CODE_DIGITS,
    expiry_minutes: 5,
    require_auth: true,
    user_validation: Some(UserValidation::MustExist),
    max_retries: 3,
    rate_limit_seconds: 120,
    template: "sensitive_operation",
};

/// Look up the policy for a wire-format code type
///
/// Returns `None` for anything that is not one of the enumerated code types;
/// callers must reject such requests instead of substituting a default.
pub fn get_policy(code_type: &str) -> Option<&'static VerificationPolicy> {
    code_type.parse::<CodeType>().ok().map(|t| t.policy())
}

/// Whether `code_type` names one of the enumerated code types
pub fn is_valid_type(code_type: &str) -> bool {
    get_policy(code_type).is_some()
}
