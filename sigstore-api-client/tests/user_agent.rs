//! End-to-end tests against a local axum server using the default hyper transport.

#![cfg(all(
    any(feature = "tls-ring", feature = "tls-aws-lc"),
    any(feature = "tls-native-roots", feature = "tls-webpki-roots")
))]

use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use axum::routing::{get, post};
use http::Method;
use sigstore_api_client::{
    ApiClient, ClientError, TransportBody, new_client, with_timeout, with_user_agent,
};

async fn echo_user_agent(headers: HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn echo_body(body: Bytes) -> Bytes {
    body
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

/// Start a server on an ephemeral port and return its base URL.
async fn serve() -> String {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let router = Router::new()
        .route("/user-agent", get(echo_user_agent))
        .route("/echo", post(echo_body))
        .route("/slow", get(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn configured_user_agent_reaches_server() {
    let base_url = serve().await;
    let client = new_client(&base_url, [with_user_agent("sigstore-e2e/1.0")]).unwrap();

    let response = client.get("/user-agent").await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), &Bytes::from("sigstore-e2e/1.0"));
}

#[tokio::test]
async fn configured_user_agent_overrides_caller_header() {
    let base_url = serve().await;
    let client = new_client(&base_url, [with_user_agent("configured")]).unwrap();

    let req = client
        .request(Method::GET, "/user-agent")
        .header(USER_AGENT, "caller")
        .body(TransportBody::empty())
        .unwrap();
    let response = client.fetch(req).await.unwrap();
    assert_eq!(response.body(), &Bytes::from("configured"));
}

#[tokio::test]
async fn unconfigured_user_agent_keeps_caller_header() {
    let base_url = serve().await;
    let client = new_client(&base_url, []).unwrap();

    let req = client
        .request(Method::GET, "/user-agent")
        .header(USER_AGENT, "caller")
        .body(TransportBody::empty())
        .unwrap();
    let response = client.fetch(req).await.unwrap();
    assert_eq!(response.body(), &Bytes::from("caller"));
}

#[tokio::test]
async fn unconfigured_user_agent_sends_transport_default() {
    let base_url = serve().await;
    let client = ApiClient::builder(&base_url).build().unwrap();

    // hyper does not add a User-Agent of its own
    let response = client.get("/user-agent").await.unwrap();
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn post_body_round_trips() {
    let base_url = serve().await;
    let client = ApiClient::builder(&base_url)
        .user_agent("sigstore-e2e/1.0")
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();

    let response = client
        .post("/echo", "application/octet-stream", "signed payload")
        .await
        .unwrap();
    assert_eq!(response.body(), &Bytes::from("signed payload"));
}

#[tokio::test]
async fn slow_server_hits_timeout() {
    let base_url = serve().await;
    let client = new_client(&base_url, [with_timeout(Duration::from_millis(100))]).unwrap();

    let err = client.get("/slow").await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn unknown_route_is_returned_not_raised() {
    let base_url = serve().await;
    let client = new_client(&base_url, []).unwrap();

    let response = client.get("/missing").await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = new_client(format!("http://{addr}"), [with_user_agent("ua")]).unwrap();
    let err = client.get("/").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
}
