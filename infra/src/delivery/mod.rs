//! Delivery Module
//!
//! Verification message senders. Real SMTP and SMS providers plug in behind
//! `nb_core::services::verification::CodeSender`; this module ships the
//! development sender used locally and in tests.

pub mod logging_sender;

pub use logging_sender::{DeliveredMessage, LoggingCodeSender};
