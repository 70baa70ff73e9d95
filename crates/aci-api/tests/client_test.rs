#![allow(clippy::unwrap_used)]
// Integration tests for `ApicClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use aci_api::{ApiErrorKind, ApicClient, Credentials, Error, SessionState, WireNode};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials() -> Credentials {
    Credentials::new("admin", SecretString::from("test-password"))
}

async fn setup() -> (MockServer, ApicClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApicClient::with_client(reqwest::Client::new(), base_url, credentials());
    (server, client)
}

fn error_envelope(code: &str, text: &str) -> serde_json::Value {
    json!({
        "totalCount": "1",
        "imdata": [{"error": {"attributes": {"code": code, "text": text}}}]
    })
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "APIC-cookie=abc123; path=/; HttpOnly")
                .set_body_json(json!({
                    "totalCount": "1",
                    "imdata": [{"aaaLogin": {"attributes": {
                        "token": "abc123",
                        "userName": "admin",
                        "refreshTimeoutSeconds": "600"
                    }}}]
                })),
        )
        .mount(server)
        .await;
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_credentials_and_replays_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .and(body_json(json!({
            "aaaUser": {"attributes": {"name": "admin", "pwd": "test-password"}}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "APIC-cookie=abc123; path=/; HttpOnly")
                .set_body_json(json!({"imdata": [{"aaaLogin": {"attributes": {
                    "token": "abc123",
                    "userName": "admin",
                    "refreshTimeoutSeconds": "600"
                }}}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/node/class/fvTenant.json"))
        .and(header("cookie", "APIC-cookie=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalCount": "1",
            "imdata": [{"fvTenant": {"attributes": {"dn": "uni/tn-common", "name": "common"}}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let info = client.login().await.unwrap();
    assert_eq!(info.user_name, "admin");
    assert_eq!(info.refresh_timeout_secs, Some(600));
    assert_eq!(client.state(), SessionState::Authenticated);

    let response = client.get("api/node/class/fvTenant.json").await.unwrap();
    assert_eq!(response.total_count, 1);
    assert_eq!(response.imdata[0].dn(), Some("uni/tn-common"));
}

#[tokio::test]
async fn test_login_falls_back_to_token_attribute() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "imdata": [{"aaaLogin": {"attributes": {"token": "tok-42"}}}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/node/class/fabricNode.json"))
        .and(header("cookie", "APIC-cookie=tok-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imdata": []})))
        .expect(1)
        .mount(&server)
        .await;

    let info = client.login().await.unwrap();
    assert_eq!(info.user_name, "admin");
    client.get("api/node/class/fabricNode.json").await.unwrap();
}

#[tokio::test]
async fn test_login_rejected_decodes_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(error_envelope("403", "Username or password is incorrect")),
        )
        .mount(&server)
        .await;

    let result = client.login().await;
    let Err(Error::LoginRejected(err)) = result else {
        panic!("expected LoginRejected, got: {result:?}");
    };
    assert_eq!(err.status, 401);
    assert_eq!(err.code(), Some("403"));
    assert_eq!(err.text(), Some("Username or password is incorrect"));
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_login_without_cookie_or_token() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imdata": []})))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::MissingSessionCookie)),
        "expected MissingSessionCookie, got: {result:?}"
    );
}

#[tokio::test]
async fn test_forbidden_clears_session() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/node/class/fvTenant.json"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(error_envelope("403", "Token was invalid")),
        )
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let result = client.get("api/node/class/fvTenant.json").await;

    let Err(Error::SessionExpired(err)) = result else {
        panic!("expected SessionExpired, got: {result:?}");
    };
    assert_eq!(err.text(), Some("Token was invalid"));
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (server, client) = setup().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogout.json"))
        .and(header("cookie", "APIC-cookie=abc123"))
        .and(body_json(json!({"aaaUser": {"attributes": {"name": "admin"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imdata": []})))
        .expect(1)
        .mount(&server)
        .await;

    client.login().await.unwrap();
    client.logout().await.unwrap();
    assert_eq!(client.state(), SessionState::Unauthenticated);

    // Second logout is a no-op.
    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_request_before_login_carries_no_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/node/class/fvTenant.json"))
        .and(|req: &Request| !req.headers.contains_key("cookie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"imdata": []})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.state(), SessionState::Unauthenticated);
    let response = client.get("api/node/class/fvTenant.json").await.unwrap();
    assert!(response.imdata.is_empty());
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_login_connection_refused_is_transport_error() {
    // Bind then drop a listener so nothing answers on the port.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base_url = Url::parse(&format!("http://{addr}")).unwrap();
    let client = ApicClient::with_client(reqwest::Client::new(), base_url, credentials());

    let err = client.login().await.unwrap_err();
    assert!(
        matches!(err, Error::Transport(_)),
        "expected Transport, got: {err:?}"
    );
    assert!(err.is_connect());
    assert!(!err.is_auth());
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_empty_session_cookie_is_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/aaaLogin.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "APIC-cookie=; path=/")
                .set_body_json(json!({
                    "imdata": [{"aaaLogin": {"attributes": {"userName": "admin"}}}]
                })),
        )
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::MissingSessionCookie)),
        "expected MissingSessionCookie, got: {result:?}"
    );
    assert_eq!(client.state(), SessionState::Unauthenticated);
}

// ── Error envelope tests ────────────────────────────────────────────

#[tokio::test]
async fn test_identity_conflict_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/mo/uni/fabric/outofsvc.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_envelope(
            "107",
            "Can't remove node identity policy - Node TEP-1-102 is already discovered.",
        )))
        .mount(&server)
        .await;

    let body = WireNode::new("fabricOOServicePol").with_attribute("dn", "uni/fabric/outofsvc");
    let result = client
        .post("api/node/mo/uni/fabric/outofsvc.json", &body)
        .await;

    let Err(Error::Api(err)) = result else {
        panic!("expected Api error, got: {result:?}");
    };
    assert_eq!(err.kind(), ApiErrorKind::IdentityConflict);
    assert_eq!(err.method, "POST");
    assert!(err.url.ends_with("/api/node/mo/uni/fabric/outofsvc.json"));
}

#[tokio::test]
async fn test_non_json_error_body_keeps_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/node/class/fvTenant.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.get("api/node/class/fvTenant.json").await;
    let Err(Error::Api(err)) = result else {
        panic!("expected Api error, got: {result:?}");
    };
    assert_eq!(err.status, 500);
    assert_eq!(err.kind(), ApiErrorKind::Unrecognized);
    assert_eq!(err.body, "<html>oops</html>");
}

// ── Response decoding tests ─────────────────────────────────────────

#[tokio::test]
async fn test_empty_mutation_response_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/node/mo/uni.json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let body = WireNode::new("fvTenant").with_attribute("dn", "uni/tn-a");
    let response = client.post("api/node/mo/uni.json", &body).await.unwrap();
    assert!(response.imdata.is_empty());
}

#[tokio::test]
async fn test_undecodable_query_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/node/class/fvTenant.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.get("api/node/class/fvTenant.json").await;
    let Err(Error::Deserialization { body, .. }) = result else {
        panic!("expected Deserialization error, got: {result:?}");
    };
    assert_eq!(body, "not json");
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = ApicClient::with_client(http, Url::parse(&server.uri()).unwrap(), credentials());

    Mock::given(method("GET"))
        .and(path("/api/node/class/fvTenant.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"imdata": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client
        .get("api/node/class/fvTenant.json")
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got: {err:?}");
}
