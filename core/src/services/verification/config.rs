//! Configuration for the verification service

use nb_shared::config::VerificationConfig;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Site name rendered into messages
    pub site_name: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            site_name: VerificationConfig::default().site_name,
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            site_name: config.site_name.clone(),
        }
    }
}
