//! StopForumSpam Client Implementation
//!
//! Issues `GET {base_url}?json=1[&api_key=..][&ip=..][&email=..][&username=..]`
//! and parses the loosely typed JSON answer through
//! [`nb_core::services::spam_check::parse_response`].

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use nb_core::errors::SpamCheckError;
use nb_core::services::spam_check::{
    parse_response, ReputationQuery, ReputationReport, ReputationSource,
};
use nb_shared::config::spam_check::DEFAULT_SPAM_CHECK_URL;
use nb_shared::config::SpamCheckConfig;

use crate::InfrastructureError;

/// Default request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// StopForumSpam HTTP client
#[derive(Debug, Clone)]
pub struct StopForumSpamClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl StopForumSpamClient {
    /// Create a client against the public endpoint with the default timeout
    pub fn new() -> Result<Self, InfrastructureError> {
        Self::build(DEFAULT_SPAM_CHECK_URL.to_string(), DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client from spam check configuration
    pub fn from_config(config: &SpamCheckConfig) -> Result<Self, InfrastructureError> {
        Self::build(config.base_url.clone(), config.timeout())
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Rebuild the client with a different request timeout
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, InfrastructureError> {
        Self::build(self.base_url, timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn build(base_url: String, timeout: Duration) -> Result<Self, InfrastructureError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nodebbs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }
}

#[async_trait]
impl ReputationSource for StopForumSpamClient {
    async fn lookup(&self, query: &ReputationQuery) -> Result<ReputationReport, SpamCheckError> {
        debug!(
            fields = query.fields.len(),
            with_api_key = query.api_key.is_some(),
            "Querying StopForumSpam"
        );

        let response = self
            .http
            .get(&self.base_url)
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpamCheckError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        parse_response(&body)
    }
}

fn map_transport_error(err: reqwest::Error) -> SpamCheckError {
    if err.is_timeout() {
        SpamCheckError::Timeout(err.to_string())
    } else if err.is_decode() || err.is_body() {
        SpamCheckError::MalformedResponse(err.to_string())
    } else {
        SpamCheckError::Unreachable(err.to_string())
    }
}
