//! Policy-driven verification code workflow
//!
//! Every request names a code type; its policy decides the delivery channel,
//! authentication and user-existence pre-conditions, expiry, retry budget and
//! resend cooldown. Delivery, storage and account lookups sit behind traits.

mod config;
mod service;
mod template;
mod traits;
mod types;


pub use config::VerificationServiceConfig;
pub use service::{mask_recipient, normalize_recipient, VerificationService};
pub use template::{render, RenderedMessage};
pub use traits::{CodeSender, CodeStore, UserDirectory};
pub use types::{RequestContext, SendCodeResult, VerifyCodeResult};
