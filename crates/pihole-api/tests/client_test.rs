#![allow(clippy::unwrap_used)]
// Session, retry and error-classification tests for `PiholeClient` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pihole_api::{ClientConfig, Error, PiholeClient};

// ── Helpers ─────────────────────────────────────────────────────────

const SID: &str = "n9n4ZTWsJz8qPvMwYrCk1A=";

/// Route `tracing` output to the test harness; `RUST_LOG=debug` shows retries.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
        .with_password("correct horse")
        .with_retry(2, Duration::from_millis(1), Duration::from_millis(5))
}

async fn setup() -> (MockServer, PiholeClient) {
    let server = MockServer::start().await;
    let client = PiholeClient::new(config(&server)).unwrap();
    (server, client)
}

fn session_body(valid: bool, sid: Option<&str>, validity: i64) -> serde_json::Value {
    json!({
        "session": {
            "valid": valid,
            "totp": false,
            "sid": sid,
            "csrf": sid.map(|_| "csrf-token"),
            "validity": validity,
            "message": if valid { "correct password" } else { "no active session" }
        },
        "took": 0.0003
    })
}

async fn mount_login(server: &MockServer, expected_logins: u64) {
    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(session_body(false, None, -1)))
        .expect(expected_logins)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .and(body_json(json!({"password": "correct horse"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(true, Some(SID), 1800)))
        .expect(expected_logins)
        .mount(server)
        .await;
}

fn groups_body() -> serde_json::Value {
    json!({
        "groups": [{
            "id": 0,
            "name": "Default",
            "enabled": true,
            "comment": "The default group",
            "date_added": 1_700_000_000,
            "date_modified": 1_700_000_000
        }],
        "took": 0.0001
    })
}

// ── Construction ────────────────────────────────────────────────────

#[test]
fn test_construction_requires_url() {
    assert!(matches!(
        PiholeClient::new(ClientConfig::default()),
        Err(Error::MissingUrl)
    ));
    assert!(matches!(
        PiholeClient::new(ClientConfig::new("http//missing-colon")),
        Err(Error::InvalidUrl(_))
    ));

    let client = PiholeClient::new(ClientConfig::new("https://pi.hole:8443/admin")).unwrap();
    assert_eq!(client.base_url().as_str(), "https://pi.hole:8443/admin/api/");
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_attaches_sid_header() {
    let (server, client) = setup().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .and(header("sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_json(groups_body()))
        .expect(1)
        .mount(&server)
        .await;

    let groups = client.list_groups(None).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "Default");
}

#[tokio::test]
async fn test_passwordless_appliance_adopts_open_session() {
    let server = MockServer::start().await;
    let client = PiholeClient::new(ClientConfig::new(server.uri())).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(true, None, 1800)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    client.authenticate().await.unwrap();
}

#[tokio::test]
async fn test_passwordless_session_without_expiry_is_reused() {
    let server = MockServer::start().await;
    let client = PiholeClient::new(ClientConfig::new(server.uri())).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(true, None, -1)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(groups_body()))
        .expect(3)
        .mount(&server)
        .await;

    for _ in 0..3 {
        client.list_groups(None).await.unwrap();
    }
}

#[tokio::test]
async fn test_missing_password_is_reported() {
    let server = MockServer::start().await;
    let client = PiholeClient::new(ClientConfig::new(server.uri())).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(session_body(false, None, -1)))
        .mount(&server)
        .await;

    let result = client.authenticate().await;
    assert!(
        matches!(result, Err(Error::AuthenticationRequired)),
        "expected AuthenticationRequired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_wrong_password_uses_remote_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(session_body(false, None, -1)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"key": "unauthorized", "message": "Unauthorized", "hint": null},
            "took": 0.002
        })))
        .mount(&server)
        .await;

    let err = client.authenticate().await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(err.to_string(), "Authentication failed: Unauthorized");
}

#[tokio::test]
async fn test_rejected_session_is_an_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(session_body(false, None, -1)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(false, None, -1)))
        .mount(&server)
        .await;

    let result = client.authenticate().await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

#[tokio::test]
async fn test_malformed_auth_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.authenticate().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Session reuse ───────────────────────────────────────────────────

#[tokio::test]
async fn test_repeated_authenticate_logs_in_once() {
    let (server, client) = setup().await;
    mount_login(&server, 1).await;

    client.authenticate().await.unwrap();
    client.authenticate().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_login() {
    init_tracing();
    let (server, client) = setup().await;
    let client = Arc::new(client);
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .and(header("sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_json(groups_body()))
        .expect(12)
        .mount(&server)
        .await;

    let calls = (0..12).map(|_| {
        let client = Arc::clone(&client);
        async move { client.list_groups(None).await }
    });

    for result in join_all(calls).await {
        assert_eq!(result.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_unauthorized_response_forces_new_login() {
    let (server, client) = setup().await;
    mount_login(&server, 2).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"key": "unauthorized", "message": "Unauthorized", "hint": null},
            "took": 0.0
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(groups_body()))
        .mount(&server)
        .await;

    let err = client.list_groups(None).await.unwrap_err();
    assert!(err.is_auth_expired());

    let groups = client.list_groups(None).await.unwrap();
    assert_eq!(groups.len(), 1);
}

// ── Retry ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_errors_retried_then_exhausted() {
    init_tracing();
    let (server, client) = setup().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(503).set_body_string("FTL restarting"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client.list_groups(None).await.unwrap_err();
    assert!(err.is_transient());
    match err.root() {
        Error::RetriesExhausted { attempts, last, .. } => {
            assert_eq!(*attempts, 3);
            assert!(last.contains("503"), "last error: {last}");
        }
        other => panic!("expected RetriesExhausted, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_negative_retry_max_means_single_attempt() {
    let server = MockServer::start().await;
    let client = PiholeClient::new(
        ClientConfig::new(server.uri())
            .with_password("correct horse")
            .with_retry(-1, Duration::from_millis(1), Duration::from_millis(5)),
    )
    .unwrap();
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.list_groups(None).await.unwrap_err();
    assert!(matches!(
        err.root(),
        Error::RetriesExhausted { attempts: 1, .. }
    ));
}

#[tokio::test]
async fn test_recovers_after_transient_failure() {
    init_tracing();
    let (server, client) = setup().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(groups_body()))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.list_groups(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_not_implemented_is_not_retried() {
    let (server, client) = setup().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(501).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.list_groups(None).await.unwrap_err();
    assert_eq!(err.status(), Some(501));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_connection_refused_exhausts_retries() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = PiholeClient::new(
        ClientConfig::new(uri)
            .with_password("correct horse")
            .with_retry(1, Duration::from_millis(1), Duration::from_millis(2)),
    )
    .unwrap();

    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, Error::RetriesExhausted { attempts: 2, .. }));
}

#[tokio::test]
async fn test_tls_handshake_failure_is_not_retried() {
    init_tracing();
    // Answers every TLS ClientHello with plain HTTP.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = stream
                .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n")
                .await;
            let _ = stream.shutdown().await;
        }
    });

    let client = PiholeClient::new(
        ClientConfig::new(format!("https://{addr}"))
            .with_password("correct horse")
            .with_retry(2, Duration::from_millis(1), Duration::from_millis(2)),
    )
    .unwrap();

    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err.root(), Error::Transport(_)), "unexpected error: {err:?}");
    assert!(!err.is_transient());
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_deadline_cancels_pending_backoff() {
    let server = MockServer::start().await;
    let client = PiholeClient::new(
        ClientConfig::new(server.uri())
            .with_password("correct horse")
            .with_retry(3, Duration::from_secs(5), Duration::from_secs(5)),
    )
    .unwrap();
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = tokio::time::timeout(Duration::from_millis(500), client.list_groups(None)).await;
    assert!(result.is_err(), "expected the deadline to fire first");
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_error_envelope_is_decoded() {
    let (server, client) = setup().await;
    mount_login(&server, 1).await;

    Mock::given(method("DELETE"))
        .and(path("/api/groups/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "key": "not_found",
                "message": "Item not found",
                "hint": "ghost"
            },
            "took": 0.0
        })))
        .mount(&server)
        .await;

    let err = client.delete_group("ghost").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.api_error_key(), Some("not_found"));
    assert_eq!(
        err.to_string(),
        "delete group ghost: API error [not_found]: Item not found (hint: ghost)"
    );
}

#[tokio::test]
async fn test_plain_error_body_keeps_status() {
    let (server, client) = setup().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad things"))
        .mount(&server)
        .await;

    let err = client.list_groups(None).await.unwrap_err();
    assert!(matches!(
        err.root(),
        Error::Status { status: 400, body } if body == "bad things"
    ));
}
