//! Integration tests for the StopForumSpam client against a local HTTP server

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use nb_core::domain::entities::{CheckType, RegistrationVerdict, SpamIdentity};
use nb_core::services::spam_check::SpamChecker;
use nb_infra::StopForumSpamClient;
use nb_shared::config::SpamCheckConfig;

/// Serve one canned response, returning the base URL and the received request line
async fn serve_once(
    status: &'static str,
    body: &'static str,
    delay: Duration,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let mut read = 0;
        loop {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            read += n;
            if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let request = String::from_utf8_lossy(&buf[..read]).to_string();
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);

        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    (format!("http://{}/api", addr), rx)
}

fn identity() -> SpamIdentity {
    SpamIdentity::new()
        .with_ip("203.0.113.7")
        .with_email("spam@example.com")
        .with_username("buy_cheap_pills")
}

fn checker_for(base_url: &str) -> SpamChecker<StopForumSpamClient> {
    let client = StopForumSpamClient::new().unwrap().with_base_url(base_url);
    SpamChecker::new(Arc::new(client))
}

#[tokio::test]
async fn test_flagged_identity() {
    let (url, request) = serve_once(
        "200 OK",
        r#"{"success":1,"ip":{"lastseen":"2024-01-05 10:00:00","frequency":5,"appears":1},"email":{"frequency":"0","appears":0}}"#,
        Duration::ZERO,
    )
    .await;

    let result = checker_for(&url)
        .check_spammer(&identity(), &[CheckType::Ip, CheckType::Email], Some("secret"))
        .await;

    assert!(result.is_spammer);
    assert_eq!(result.confidence, 50);
    assert!(result.error.is_none());
    assert_eq!(
        result.details[&CheckType::Ip].last_seen.as_deref(),
        Some("2024-01-05 10:00:00")
    );
    assert!(!result.details[&CheckType::Email].appears);

    let request_line = request.await.unwrap();
    assert!(request_line.starts_with("GET /api?"));
    assert!(request_line.contains("json=1"));
    assert!(request_line.contains("api_key=secret"));
    assert!(request_line.contains("ip=203.0.113.7"));
    assert!(request_line.contains("email=spam%40example.com"));
    assert!(!request_line.contains("username="));
}

#[tokio::test]
async fn test_server_error_fails_open() {
    let (url, _request) = serve_once(
        "500 Internal Server Error",
        r#"{"error":"boom"}"#,
        Duration::ZERO,
    )
    .await;

    let result = checker_for(&url)
        .check_spammer(&identity(), &CheckType::ALL, None)
        .await;

    assert!(!result.is_spammer);
    assert_eq!(result.confidence, 0);
    assert!(result.details.is_empty());
    assert!(result.error.unwrap().contains("500"));
}

#[tokio::test]
async fn test_malformed_body_fails_open() {
    let (url, _request) = serve_once("200 OK", "<html>maintenance</html>", Duration::ZERO).await;

    let result = checker_for(&url)
        .check_spammer(&identity(), &CheckType::ALL, None)
        .await;

    assert!(!result.is_spammer);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_unsuccessful_payload_fails_open() {
    let (url, _request) = serve_once(
        "200 OK",
        r#"{"success":0,"error":"invalid api key"}"#,
        Duration::ZERO,
    )
    .await;

    let result = checker_for(&url)
        .check_spammer(&identity(), &CheckType::ALL, Some("wrong"))
        .await;

    assert!(!result.is_spammer);
    assert!(result.error.unwrap().contains("invalid api key"));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let (url, _request) = serve_once(
        "200 OK",
        r#"{"success":1,"ip":{"appears":1,"frequency":10}}"#,
        Duration::from_secs(3),
    )
    .await;
    let client = StopForumSpamClient::new()
        .unwrap()
        .with_base_url(url)
        .with_timeout(Duration::from_millis(200))
        .unwrap();
    let checker = SpamChecker::new(Arc::new(client));

    let result = checker
        .check_spammer(&identity(), &[CheckType::Ip], None)
        .await;

    assert!(!result.is_spammer);
    assert!(result.error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_unreachable_server_fails_open() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = checker_for(&format!("http://{}/api", addr))
        .check_spammer(&identity(), &CheckType::ALL, None)
        .await;

    assert!(!result.is_spammer);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_registration_screening_end_to_end() {
    let (url, request) = serve_once(
        "200 OK",
        r#"{"success":true,"ip":{"appears":false,"frequency":0},"email":{"appears":true,"frequency":12}}"#,
        Duration::ZERO,
    )
    .await;
    let config = SpamCheckConfig {
        base_url: url,
        check_types: vec!["ip".into(), "email".into()],
        block_threshold: 60,
        ..Default::default()
    };
    let client = StopForumSpamClient::from_config(&config).unwrap();
    let checker = SpamChecker::new(Arc::new(client));

    let verdict = checker.screen_registration(&identity(), &config).await;

    assert_eq!(
        verdict,
        RegistrationVerdict::Block {
            confidence: 100,
            flagged: vec![CheckType::Email],
        }
    );
    assert!(!request.await.unwrap().contains("username="));
}
