//! Unit tests for the spam checker

use std::sync::Arc;
use std::time::Duration;

use nb_shared::config::SpamCheckConfig;

use crate::domain::entities::spam_check::{CheckType, RegistrationVerdict, SpamIdentity};
use crate::errors::SpamCheckError;
use crate::services::spam_check::SpamChecker;

use super::mocks::MockReputationSource;

fn full_identity() -> SpamIdentity {
    SpamIdentity::new()
        .with_ip("203.0.113.7")
        .with_email("spam@example.com")
        .with_username("buy_cheap_pills")
}

#[tokio::test]
async fn test_no_identity_fields_skips_lookup() {
    let source = Arc::new(MockReputationSource::with_body(r#"{"success":1}"#));
    let checker = SpamChecker::new(source.clone());

    let result = checker
        .check_spammer(&SpamIdentity::new(), &CheckType::ALL, Some("key"))
        .await;

    assert!(!result.is_spammer);
    assert_eq!(result.confidence, 0);
    assert!(result.details.is_empty());
    assert!(result.error.is_none());
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn test_requested_fields_absent_skips_lookup() {
    let source = Arc::new(MockReputationSource::with_body(r#"{"success":1}"#));
    let checker = SpamChecker::new(source.clone());
    let identity = SpamIdentity::new().with_email("someone@example.com");

    let result = checker.check_spammer(&identity, &[CheckType::Ip], None).await;

    assert!(!result.is_spammer);
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn test_single_flagged_ip() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":true,"ip":{"appears":1,"frequency":5}}"#,
    ));
    let checker = SpamChecker::new(source.clone());

    let result = checker
        .check_spammer(&full_identity(), &[CheckType::Ip], Some("secret"))
        .await;

    assert!(result.is_spammer);
    assert_eq!(result.confidence, 50);
    assert_eq!(result.details.len(), 1);
    let ip = &result.details[&CheckType::Ip];
    assert!(ip.appears);
    assert_eq!(ip.frequency, 5);
    assert!(result.error.is_none());

    let query = source.last_query().unwrap();
    assert_eq!(query.fields, vec![(CheckType::Ip, "203.0.113.7".to_string())]);
    assert_eq!(query.api_key.as_deref(), Some("secret"));
}

#[tokio::test]
async fn test_confidence_is_maximum_not_sum() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":1,"ip":{"appears":1,"frequency":5},"email":{"appears":1,"frequency":20}}"#,
    ));
    let checker = SpamChecker::new(source);

    let result = checker
        .check_spammer(&full_identity(), &[CheckType::Ip, CheckType::Email], None)
        .await;

    assert!(result.is_spammer);
    assert_eq!(result.confidence, 100);
    assert_eq!(result.details.len(), 2);
}

#[tokio::test]
async fn test_weak_signals_do_not_accumulate() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":1,"ip":{"appears":1,"frequency":2},"email":{"appears":1,"frequency":3},"username":{"appears":1,"frequency":1}}"#,
    ));
    let checker = SpamChecker::new(source);

    let result = checker
        .check_spammer(&full_identity(), &CheckType::ALL, None)
        .await;

    assert!(result.is_spammer);
    assert_eq!(result.confidence, 30);
}

#[tokio::test]
async fn test_details_recorded_for_clean_fields() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":1,"ip":{"appears":0,"frequency":0},"email":{"appears":0,"frequency":0}}"#,
    ));
    let checker = SpamChecker::new(source);

    let result = checker
        .check_spammer(&full_identity(), &[CheckType::Ip, CheckType::Email], None)
        .await;

    assert!(!result.is_spammer);
    assert_eq!(result.confidence, 0);
    assert_eq!(result.details.len(), 2);
    assert!(!result.details[&CheckType::Email].appears);
}

#[tokio::test]
async fn test_unrequested_response_fields_are_ignored() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":1,"ip":{"appears":0,"frequency":0},"username":{"appears":1,"frequency":9}}"#,
    ));
    let checker = SpamChecker::new(source.clone());

    let result = checker
        .check_spammer(&full_identity(), &[CheckType::Ip, CheckType::Ip], None)
        .await;

    assert!(!result.is_spammer);
    assert!(!result.details.contains_key(&CheckType::Username));
    assert_eq!(source.last_query().unwrap().fields.len(), 1);
}

#[tokio::test]
async fn test_network_failure_fails_open() {
    let source = Arc::new(MockReputationSource::failing(SpamCheckError::Unreachable(
        "connection refused".to_string(),
    )));
    let checker = SpamChecker::new(source);

    let result = checker
        .check_spammer(&full_identity(), &CheckType::ALL, None)
        .await;

    assert!(!result.is_spammer);
    assert_eq!(result.confidence, 0);
    assert!(result.details.is_empty());
    assert!(result.error.as_deref().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_unsuccessful_payload_behaves_like_failure() {
    let source = Arc::new(MockReputationSource::with_body(r#"{"success":false}"#));
    let checker = SpamChecker::new(source);

    let result = checker
        .check_spammer(&full_identity(), &CheckType::ALL, None)
        .await;

    assert!(!result.is_spammer);
    assert_eq!(result.confidence, 0);
    assert!(result.details.is_empty());
    assert!(result.error.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_slow_upstream_times_out() {
    let source = Arc::new(
        MockReputationSource::with_body(r#"{"success":1,"ip":{"appears":1,"frequency":10}}"#)
            .with_delay(Duration::from_secs(30)),
    );
    let checker = SpamChecker::new(source);
    assert_eq!(checker.timeout(), Duration::from_secs(5));

    let result = checker
        .check_spammer(&full_identity(), &[CheckType::Ip], None)
        .await;

    assert!(!result.is_spammer);
    assert!(result.error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_screen_registration_disabled_skips_lookup() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":1,"ip":{"appears":1,"frequency":10}}"#,
    ));
    let checker = SpamChecker::new(source.clone());
    let config = SpamCheckConfig {
        enabled: false,
        ..Default::default()
    };

    let verdict = checker.screen_registration(&full_identity(), &config).await;

    assert_eq!(verdict, RegistrationVerdict::Allow);
    assert_eq!(source.call_count(), 0);
}

#[tokio::test]
async fn test_screen_registration_blocks_above_threshold() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":1,"ip":{"appears":0,"frequency":0},"email":{"appears":1,"frequency":8}}"#,
    ));
    let checker = SpamChecker::new(source.clone());
    let config = SpamCheckConfig {
        check_types: vec!["ip".into(), "email".into(), "phone".into()],
        api_key: Some("secret".into()),
        block_threshold: 60,
        ..Default::default()
    };

    let verdict = checker.screen_registration(&full_identity(), &config).await;

    assert_eq!(
        verdict,
        RegistrationVerdict::Block {
            confidence: 80,
            flagged: vec![CheckType::Email],
        }
    );
    let query = source.last_query().unwrap();
    assert_eq!(query.fields.len(), 2);
    assert_eq!(query.api_key.as_deref(), Some("secret"));
}

#[tokio::test]
async fn test_screen_registration_allows_below_threshold() {
    let source = Arc::new(MockReputationSource::with_body(
        r#"{"success":1,"email":{"appears":1,"frequency":2}}"#,
    ));
    let checker = SpamChecker::new(source);
    let config = SpamCheckConfig {
        block_threshold: 50,
        ..Default::default()
    };

    let verdict = checker.screen_registration(&full_identity(), &config).await;
    assert_eq!(verdict, RegistrationVerdict::Allow);
}

#[tokio::test]
async fn test_screen_registration_allows_when_upstream_down() {
    let source = Arc::new(MockReputationSource::failing(SpamCheckError::HttpStatus(503)));
    let checker = SpamChecker::new(source);

    let verdict = checker
        .screen_registration(&full_identity(), &SpamCheckConfig::default())
        .await;
    assert_eq!(verdict, RegistrationVerdict::Allow);
}
