//! # NodeBBS Core
//!
//! Domain layer for NodeBBS account verification: the verification code
//! policy table, the policy-driven code workflow, and fail-open spam
//! screening against an external reputation service. Delivery, storage and
//! the reputation service itself sit behind traits implemented in `nb_infra`.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::{
    CodeSender, CodeStore, RenderedMessage, ReputationQuery, ReputationReport, ReputationSource,
    RequestContext, SendCodeResult, SpamChecker, UserDirectory, VerificationService,
    VerificationServiceConfig, VerifyCodeResult,
};
