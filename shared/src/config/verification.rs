//! Verification code delivery configuration

use serde::{Deserialize, Serialize};

/// Settings for rendering and delivering verification codes
///
/// Per-flow parameters (digits, expiry, retries, cooldown) are fixed by the
/// verification policy table in `nb_core`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Site name substituted into message templates
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Print delivered messages to stdout (development sender only)
    #[serde(default)]
    pub sender_console_output: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            sender_console_output: false,
        }
    }
}

impl VerificationConfig {
    /// Apply environment overrides on top of `base`
    pub fn from_env_or(base: Self) -> Self {
        Self {
            site_name: std::env::var("SITE_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(base.site_name),
            sender_console_output: std::env::var("VERIFICATION_CONSOLE_OUTPUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.sender_console_output),
        }
    }
}

fn default_site_name() -> String {
    String::from("NodeBBS")
}
