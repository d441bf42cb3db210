//! Mock reputation source for testing the spam checker

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::SpamCheckError;
use crate::services::spam_check::{parse_response, ReputationQuery, ReputationReport, ReputationSource};

/// Replays a canned upstream body (or error) and records every query
pub struct MockReputationSource {
    pub response: Result<String, SpamCheckError>,
    pub delay: Option<Duration>,
    pub queries: Arc<Mutex<Vec<ReputationQuery>>>,
}

impl MockReputationSource {
    pub fn with_body(body: &str) -> Self {
        Self {
            response: Ok(body.to_string()),
            delay: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: SpamCheckError) -> Self {
        Self {
            response: Err(error),
            delay: None,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<ReputationQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReputationSource for MockReputationSource {
    async fn lookup(&self, query: &ReputationQuery) -> Result<ReputationReport, SpamCheckError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.response {
            Ok(body) => parse_response(body),
            Err(e) => Err(e.clone()),
        }
    }
}
