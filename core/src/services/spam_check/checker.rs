//! Fail-open spam checker

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use nb_shared::config::SpamCheckConfig;
use nb_shared::email::mask_email;

use crate::domain::entities::spam_check::{
    CheckType, RegistrationVerdict, SpamCheckResult, SpamIdentity,
};
use crate::errors::SpamCheckError;

use super::traits::{ReputationQuery, ReputationSource};

/// Hard deadline for one reputation lookup
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(5000);

/// Each reported occurrence adds this much confidence, capped at 100
const CONFIDENCE_PER_REPORT: u32 = 10;

/// Spam checker over a reputation source
///
/// `check_spammer` never fails: any upstream problem produces a non-spammer
/// result with `error` set, so an unreachable reputation service cannot block
/// registration.
pub struct SpamChecker<R: ReputationSource> {
    source: Arc<R>,
    timeout: Duration,
}

impl<R: ReputationSource> SpamChecker<R> {
    pub fn new(source: Arc<R>) -> Self {
        Self {
            source,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the lookup deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check an identity against the reputation service
    ///
    /// Only fields listed in `check_types` and present (non-blank) in
    /// `identity` are sent. With nothing to send, no lookup is made.
    ///
    /// Confidence is the maximum over flagged fields of
    /// `min(100, frequency * 10)`, not a sum.
    pub async fn check_spammer(
        &self,
        identity: &SpamIdentity,
        check_types: &[CheckType],
        api_key: Option<&str>,
    ) -> SpamCheckResult {
        let query = build_query(identity, check_types, api_key);
        if query.is_empty() {
            tracing::debug!(event = "spam_check_skipped", "No identity fields to check");
            return SpamCheckResult::clean();
        }

        let lookup = tokio::time::timeout(self.timeout, self.source.lookup(&query)).await;
        let report = match lookup {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => return fail_open(e),
            Err(_) => {
                return fail_open(SpamCheckError::Timeout(format!(
                    "no response within {} ms",
                    self.timeout.as_millis()
                )))
            }
        };

        let mut result = SpamCheckResult::clean();
        for (check_type, _) in &query.fields {
            let Some(field) = report.field(*check_type) else {
                continue;
            };
            if field.appears {
                result.is_spammer = true;
                let score = field
                    .frequency
                    .saturating_mul(CONFIDENCE_PER_REPORT)
                    .min(100) as u8;
                result.confidence = result.confidence.max(score);
            }
            result.details.insert(*check_type, field.clone());
        }

        if result.is_spammer {
            tracing::info!(
                event = "spam_check_flagged",
                confidence = result.confidence,
                email = identity.email.as_deref().map(mask_email).unwrap_or_default(),
                "Identity reported by reputation service"
            );
        }

        result
    }

    /// Decide whether a registration may proceed
    ///
    /// Disabled screening allows without a lookup. A flagged identity is
    /// blocked when its confidence reaches `block_threshold`; a degraded check
    /// always allows.
    pub async fn screen_registration(
        &self,
        identity: &SpamIdentity,
        config: &SpamCheckConfig,
    ) -> RegistrationVerdict {
        if !config.enabled {
            return RegistrationVerdict::Allow;
        }

        let check_types: Vec<CheckType> = config
            .check_types
            .iter()
            .filter_map(|name| match name.parse() {
                Ok(check_type) => Some(check_type),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring configured spam check type");
                    None
                }
            })
            .collect();

        let result = self
            .check_spammer(identity, &check_types, config.api_key.as_deref())
            .await;

        if result.is_spammer && result.confidence >= config.block_threshold {
            let flagged = result
                .details
                .iter()
                .filter(|(_, report)| report.appears)
                .map(|(check_type, _)| *check_type)
                .collect();
            tracing::warn!(
                event = "registration_blocked",
                confidence = result.confidence,
                "Registration blocked by spam check"
            );
            RegistrationVerdict::Block {
                confidence: result.confidence,
                flagged,
            }
        } else {
            RegistrationVerdict::Allow
        }
    }
}

fn build_query(
    identity: &SpamIdentity,
    check_types: &[CheckType],
    api_key: Option<&str>,
) -> ReputationQuery {
    let requested: BTreeSet<CheckType> = check_types.iter().copied().collect();
    let fields = requested
        .into_iter()
        .filter_map(|check_type| {
            identity
                .field(check_type)
                .map(|value| (check_type, value.to_string()))
        })
        .collect();

    ReputationQuery {
        fields,
        api_key: api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string),
    }
}

fn fail_open(error: SpamCheckError) -> SpamCheckResult {
    tracing::warn!(
        event = "spam_check_unavailable",
        error = %error,
        "Spam check failed, allowing request"
    );
    SpamCheckResult::failed(error.to_string())
}
