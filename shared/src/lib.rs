//! Shared utilities and common types for the NodeBBS server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (environment, logging, verification, spam checking)
//! - Recipient validation and masking helpers (phone numbers, email addresses)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, LogFormat, LoggingConfig, SpamCheckConfig, VerificationConfig,
};
pub use utils::{email, phone};
