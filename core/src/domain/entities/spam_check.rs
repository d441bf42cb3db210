//! Spam check domain types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identity field that can be checked against the reputation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    Ip,
    Email,
    Username,
}

impl CheckType {
    pub const ALL: [CheckType; 3] = [CheckType::Ip, CheckType::Email, CheckType::Username];

    /// Query parameter and response field name
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Ip => "ip",
            CheckType::Email => "email",
            CheckType::Username => "username",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ip" => Ok(CheckType::Ip),
            "email" => Ok(CheckType::Email),
            "username" => Ok(CheckType::Username),
            other => Err(format!("Unknown spam check type: {}", other)),
        }
    }
}

/// Identity submitted at registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpamIdentity {
    pub ip: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl SpamIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Value of one identity field; blank values count as absent
    pub fn field(&self, check_type: CheckType) -> Option<&str> {
        let value = match check_type {
            CheckType::Ip => self.ip.as_deref(),
            CheckType::Email => self.email.as_deref(),
            CheckType::Username => self.username.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Per-field reputation record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub appears: bool,
    pub frequency: u32,
    /// Last time the value was reported, as given by the upstream (`"2024-01-31 10:12:00"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

/// Aggregated verdict of one spam check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamCheckResult {
    pub is_spammer: bool,
    /// Strength of evidence, 0-100
    pub confidence: u8,
    pub details: BTreeMap<CheckType, FieldReport>,
    /// Set when the check could not be completed (the verdict is then fail-open)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpamCheckResult {
    /// Non-spammer result with no evidence
    pub fn clean() -> Self {
        Self::default()
    }

    /// Fail-open result carrying the reason the check could not complete
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Registration-time decision derived from a spam check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum RegistrationVerdict {
    Allow,
    Block {
        confidence: u8,
        /// Fields that were reported as abusive
        flagged: Vec<CheckType>,
    },
}

impl RegistrationVerdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, RegistrationVerdict::Block { .. })
    }
}
