//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `environment` - Environment detection and logging configuration
//! - `spam_check` - Registration anti-spam lookups (StopForumSpam)
//! - `verification` - Verification code delivery settings

pub mod environment;
pub mod spam_check;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use spam_check::SpamCheckConfig;
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Verification code delivery configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Spam check configuration
    #[serde(default)]
    pub spam_check: SpamCheckConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            verification: VerificationConfig::default(),
            spam_check: SpamCheckConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            verification: VerificationConfig {
                sender_console_output: true,
                ..Default::default()
            },
            spam_check: SpamCheckConfig {
                enabled: false,
                ..Default::default()
            },
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            verification: VerificationConfig {
                sender_console_output: false,
                ..Default::default()
            },
            spam_check: SpamCheckConfig {
                enabled: true,
                ..Default::default()
            },
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };
        config.verification = VerificationConfig::from_env_or(config.verification);
        config.spam_check = SpamCheckConfig::from_env_or(config.spam_check);
        config
    }
}
