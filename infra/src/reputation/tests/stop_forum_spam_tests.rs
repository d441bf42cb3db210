//! Unit tests for the StopForumSpam client

use std::time::Duration;

use nb_shared::config::SpamCheckConfig;

use crate::reputation::stop_forum_spam::DEFAULT_REQUEST_TIMEOUT;
use crate::reputation::StopForumSpamClient;

#[test]
fn test_default_client() {
    let client = StopForumSpamClient::new().unwrap();
    assert_eq!(client.base_url(), "https://api.stopforumspam.org/api");
    assert_eq!(client.timeout(), DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(client.timeout(), Duration::from_secs(5));
}

#[test]
fn test_client_from_config() {
    let config = SpamCheckConfig {
        base_url: "http://127.0.0.1:9/api".to_string(),
        timeout_ms: 750,
        ..Default::default()
    };

    let client = StopForumSpamClient::from_config(&config).unwrap();
    assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
    assert_eq!(client.timeout(), Duration::from_millis(750));
}

#[test]
fn test_builder_overrides() {
    let client = StopForumSpamClient::new()
        .unwrap()
        .with_base_url("http://localhost:8080/api")
        .with_timeout(Duration::from_secs(2))
        .unwrap();

    assert_eq!(client.base_url(), "http://localhost:8080/api");
    assert_eq!(client.timeout(), Duration::from_secs(2));
}
