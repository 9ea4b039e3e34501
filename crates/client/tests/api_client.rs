#![cfg(not(target_arch = "wasm32"))]

use huddle_client::{ApiClient, ClientConfig, RequestConfig};
use huddle_shared::ApiError;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const USER_ID: &str = "6f1c1a0e-4b7b-4a4e-9d63-2f6f0c6b9a01";

fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
    ApiClient::new(ClientConfig::new(server.uri(), "")).with_token(token.map(String::from))
}

#[tokio::test]
async fn sends_bearer_token_and_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("authorization", "Bearer t-123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID, "name": "ada"})))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server, Some("t-123")).me().await.unwrap();
    assert_eq!(user.name, "ada");
    assert_eq!(user.id.to_string(), USER_ID);
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID, "name": "ada"})))
        .mount(&server)
        .await;

    client(&server, None).me().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(
        requests[0].headers.get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn serializes_body_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_json(json!({"name": "grace"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "new-token"})))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client(&server, None).create_user("grace").await.unwrap();
    assert_eq!(resp.token, "new-token");
}

#[tokio::test]
async fn sends_no_body_when_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID, "users": []})))
        .mount(&server)
        .await;

    let call = client(&server, Some("t")).create_call().await.unwrap();
    assert!(call.users.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn non_success_carries_status_text() {
    let server = MockServer::start().await;
    Mock::given(path("/api/me"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})))
        .mount(&server)
        .await;
    Mock::given(path("/api/calls"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = client(&server, Some("bad"));

    let err = api.me().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Http {
            status_text: "Not Found".to_string()
        }
    );
    assert_eq!(err.to_string(), "Not Found");

    let err = api.create_call().await.unwrap_err();
    assert_eq!(err.to_string(), "Internal Server Error");
}

#[tokio::test]
async fn success_returns_parsed_json() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/things/1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true, "n": [1, 2]})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/things/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let api = client(&server, None);
    let value = api
        .request(
            "/api/things/1",
            RequestConfig::new(Method::PUT).with_body(json!({"name": "x"})),
        )
        .await
        .unwrap();
    assert_eq!(value, json!({"ok": true, "n": [1, 2]}));

    let empty = api
        .request("/api/things/1", RequestConfig::new(Method::DELETE))
        .await
        .unwrap();
    assert_eq!(empty, Value::Null);
    api.delete("/api/things/1").await.unwrap();
}

#[tokio::test]
async fn extra_headers_are_kept_but_content_type_is_forced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .and(header("x-request-id", "abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID, "name": "ada"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfig::new(Method::GET)
        .with_header(HeaderName::from_static("x-request-id"), HeaderValue::from_static("abc"))
        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

    client(&server, None).request("/api/me", config).await.unwrap();
}

#[tokio::test]
async fn undecodable_success_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server, None).me().await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialize(_)));
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let api = ApiClient::new(ClientConfig::new(format!("http://127.0.0.1:{port}"), ""))
        .with_token(None);

    let err = api.me().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn token_that_is_not_a_header_value_is_an_invalid_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server, Some("abc\ndef")).me().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)), "{err:?}");
}

#[tokio::test]
async fn unencodable_body_is_an_invalid_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // JSON object keys must be strings.
    let body: std::collections::HashMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();
    let err = client(&server, None)
        .post_json::<_, Value>("/api/things", &body)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)), "{err:?}");
}

#[tokio::test]
async fn create_call_parses_rest_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/calls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "users": [],
            "created_at": "Fri, 05 Jan 2024 09:03:07 GMT",
            "updated_at": "Fri, 05 Jan 2024 09:03:07 GMT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let call = client(&server, Some("t")).create_call().await.unwrap();
    assert!(call.users.is_empty());
    assert_eq!(
        call.created_at.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
        "2024-01-05 09:03:07"
    );
}
