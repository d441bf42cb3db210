//! Trait for reputation service integration

use async_trait::async_trait;

use crate::domain::entities::spam_check::CheckType;
use crate::errors::SpamCheckError;

use super::wire::ReputationReport;

/// One outbound lookup: only the identity fields that were requested and present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReputationQuery {
    pub fields: Vec<(CheckType, String)>,
    pub api_key: Option<String>,
}

impl ReputationQuery {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, check_type: CheckType) -> bool {
        self.fields.iter().any(|(t, _)| *t == check_type)
    }

    /// Query-string pairs for the StopForumSpam API (`json=1`, `api_key`, fields)
    pub fn to_query_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = vec![("json", "1")];
        if let Some(key) = self.api_key.as_deref() {
            pairs.push(("api_key", key));
        }
        for (check_type, value) in &self.fields {
            pairs.push((check_type.as_str(), value.as_str()));
        }
        pairs
    }
}

/// Reputation lookup backend (StopForumSpam over HTTP in production)
#[async_trait]
pub trait ReputationSource: Send + Sync {
    /// Perform a single lookup; no retries
    async fn lookup(&self, query: &ReputationQuery) -> Result<ReputationReport, SpamCheckError>;
}
