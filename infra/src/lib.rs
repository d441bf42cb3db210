//! # Infrastructure Layer
//!
//! Concrete implementations of the `nb_core` seams for NodeBBS:
//!
//! - **Reputation**: StopForumSpam client over `reqwest`
//! - **Cache**: in-memory pending code storage
//! - **Delivery**: development sender that logs masked messages
//! - **Directory**: in-memory account directory
//! - **Config**: `.env` and `NODEBBS__*` configuration loading, tracing setup

// Re-export core types for convenience
pub use nb_core::errors::*;

/// Cache module - pending verification code storage
pub mod cache;

/// Configuration loading
pub mod config;

/// Delivery module - verification message senders
pub mod delivery;

/// Directory module - account existence lookups
pub mod directory;

/// Reputation module - StopForumSpam client
pub mod reputation;

/// Tracing subscriber setup
pub mod telemetry;

pub use cache::InMemoryCodeStore;
pub use config::{dotenv_files, load_config};
pub use delivery::LoggingCodeSender;
pub use directory::InMemoryUserDirectory;
pub use reputation::StopForumSpamClient;
pub use telemetry::init_tracing;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Message delivery error
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Code storage error
    #[error("Store error: {0}")]
    Store(String),
}

impl From<::config::ConfigError> for InfrastructureError {
    fn from(err: ::config::ConfigError) -> Self {
        InfrastructureError::Config(err.to_string())
    }
}
