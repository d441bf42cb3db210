//! Business services containing domain logic and use cases.

pub mod spam_check;
pub mod verification;

// Re-export commonly used types
pub use spam_check::{ReputationQuery, ReputationReport, ReputationSource, SpamChecker};
pub use verification::{
    CodeSender, CodeStore, RenderedMessage, RequestContext, SendCodeResult, UserDirectory,
    VerificationService, VerificationServiceConfig, VerifyCodeResult,
};
