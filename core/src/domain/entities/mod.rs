//! Domain entities representing core business objects.

pub mod spam_check;
pub mod verification_code;
pub mod verification_policy;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use spam_check::{CheckType, FieldReport, RegistrationVerdict, SpamCheckResult, SpamIdentity};
pub use verification_code::{CodeCheck, VerificationCode};
pub use verification_policy::{
    get_policy, is_valid_type, Channel, CodeType, UserValidation, VerificationPolicy,
};
