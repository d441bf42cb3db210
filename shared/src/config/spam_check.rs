//! Spam check configuration module

use serde::{Deserialize, Serialize};

/// Default StopForumSpam API endpoint
pub const DEFAULT_SPAM_CHECK_URL: &str = "https://api.stopforumspam.org/api";

/// Default upstream timeout in milliseconds
pub const DEFAULT_SPAM_CHECK_TIMEOUT_MS: u64 = 5000;

/// Registration anti-spam lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpamCheckConfig {
    /// Whether registrations are screened at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Reputation service endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional API key sent as `api_key`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upstream request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Identity fields to check ("ip", "email", "username")
    #[serde(default = "default_check_types")]
    pub check_types: Vec<String>,

    /// Minimum confidence (0-100) at which a flagged identity is blocked
    #[serde(default)]
    pub block_threshold: u8,
}

impl Default for SpamCheckConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            check_types: default_check_types(),
            block_threshold: 0,
        }
    }
}

impl SpamCheckConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_env_or(Self::default())
    }

    /// Apply environment overrides on top of `base`
    pub fn from_env_or(base: Self) -> Self {
        let enabled = std::env::var("SPAM_CHECK_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(base.enabled);
        let base_url = std::env::var("SPAM_CHECK_BASE_URL").unwrap_or(base.base_url);
        let api_key = std::env::var("STOPFORUMSPAM_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or(base.api_key);
        let timeout_ms = std::env::var("SPAM_CHECK_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(base.timeout_ms);
        let check_types = std::env::var("SPAM_CHECK_TYPES")
            .ok()
            .map(|v| parse_check_types(&v))
            .unwrap_or(base.check_types);
        let block_threshold = std::env::var("SPAM_CHECK_BLOCK_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(base.block_threshold);

        Self {
            enabled,
            base_url,
            api_key,
            timeout_ms,
            check_types,
            block_threshold: block_threshold.min(100),
        }
    }

    /// Upstream timeout as a `Duration`
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Split a comma separated list such as `"ip, email"` into lowercase entries
pub fn parse_check_types(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_SPAM_CHECK_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_SPAM_CHECK_TIMEOUT_MS
}

fn default_check_types() -> Vec<String> {
    vec!["ip".to_string(), "email".to_string(), "username".to_string()]
}
