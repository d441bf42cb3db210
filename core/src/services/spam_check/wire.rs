//! Parsing of the reputation service's JSON payload.
//!
//! StopForumSpam is loosely typed: `success` and `appears` arrive as `1`/`0`
//! or booleans, `frequency` as a number or a numeric string, and each field
//! object is optional. Everything is normalized here so the rest of the
//! crate only sees [`ReputationReport`].

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::entities::spam_check::{CheckType, FieldReport};
use crate::errors::SpamCheckError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseFlag {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl LooseFlag {
    fn is_set(&self) -> bool {
        match self {
            LooseFlag::Bool(b) => *b,
            LooseFlag::Number(n) => *n != 0,
            LooseFlag::Text(s) => matches!(s.trim(), "1" | "true" | "yes"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseCount {
    Number(u64),
    Float(f64),
    Text(String),
}

impl LooseCount {
    fn value(&self) -> u32 {
        match self {
            LooseCount::Number(n) => u32::try_from(*n).unwrap_or(u32::MAX),
            LooseCount::Float(f) if *f > 0.0 => f.min(u32::MAX as f64) as u32,
            LooseCount::Float(_) => 0,
            LooseCount::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawFieldReport {
    appears: Option<LooseFlag>,
    frequency: Option<LooseCount>,
    lastseen: Option<String>,
}

impl From<RawFieldReport> for FieldReport {
    fn from(raw: RawFieldReport) -> Self {
        FieldReport {
            appears: raw.appears.map(|a| a.is_set()).unwrap_or(false),
            frequency: raw.frequency.map(|f| f.value()).unwrap_or(0),
            last_seen: raw.lastseen.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    success: Option<LooseFlag>,
    error: Option<String>,
    ip: Option<RawFieldReport>,
    email: Option<RawFieldReport>,
    username: Option<RawFieldReport>,
}

/// Strongly typed view of one successful reputation lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReputationReport {
    fields: BTreeMap<CheckType, FieldReport>,
}

impl ReputationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, check_type: CheckType, report: FieldReport) -> Self {
        self.fields.insert(check_type, report);
        self
    }

    pub fn field(&self, check_type: CheckType) -> Option<&FieldReport> {
        self.fields.get(&check_type)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse a response body into a [`ReputationReport`]
///
/// Malformed JSON, a missing `success` flag, or `success` false are all errors.
pub fn parse_response(body: &str) -> Result<ReputationReport, SpamCheckError> {
    let raw: RawResponse = serde_json::from_str(body)
        .map_err(|e| SpamCheckError::MalformedResponse(e.to_string()))?;

    match &raw.success {
        Some(flag) if flag.is_set() => {}
        Some(_) => {
            return Err(SpamCheckError::Unsuccessful(
                raw.error.unwrap_or_else(|| "success flag not set".to_string()),
            ))
        }
        None => {
            return Err(SpamCheckError::MalformedResponse(
                "missing success flag".to_string(),
            ))
        }
    }

    let mut report = ReputationReport::new();
    for (check_type, field) in [
        (CheckType::Ip, raw.ip),
        (CheckType::Email, raw.email),
        (CheckType::Username, raw.username),
    ] {
        if let Some(field) = field {
            report = report.with_field(check_type, field.into());
        }
    }
    Ok(report)
}
