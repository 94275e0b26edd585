use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shared::error::FetchErrorKind;
use tokio::{net::TcpListener, sync::Mutex};

use super::*;

#[derive(Debug, Clone)]
struct CapturedRequest {
    query: HashMap<String, String>,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct ServerState {
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn handle_products(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    state.captured.lock().await.push(CapturedRequest {
        query,
        authorization: header_value(&headers, "authorization"),
        content_type: None,
        body: None,
    });
    Json(json!({
        "data": [{ "id": 1, "name": "Coke", "image": { "url": "/c.jpg" } }]
    }))
}

async fn handle_contacts(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    state.captured.lock().await.push(CapturedRequest {
        query: HashMap::new(),
        authorization: header_value(&headers, "authorization"),
        content_type: header_value(&headers, "content-type"),
        body: Some(body),
    });
    StatusCode::OK
}

async fn handle_broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn handle_not_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn spawn_content_server() -> (String, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/products", get(handle_products))
        .route("/api/contacts", post(handle_contacts))
        .route("/api/campaigns", get(handle_broken))
        .route("/api/newsletters", post(handle_broken))
        .route("/api/pages", get(handle_not_json))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

#[test]
fn config_strips_trailing_slash_and_blank_token() {
    let config = ContentServiceConfig::new("http://cms.local/ ", Some("   ".into()));
    assert_eq!(config.base_url(), "http://cms.local");
    assert_eq!(config.api_token(), None);
    assert_eq!(
        config.collection_url("products"),
        "http://cms.local/api/products"
    );
}

#[test]
fn default_config_points_at_local_service() {
    let config = ContentServiceConfig::default();
    assert_eq!(config.base_url(), "http://localhost:1337");
    assert_eq!(config.api_token(), None);
}

#[tokio::test]
async fn fetch_collection_sends_populate_and_bearer_token() {
    let (base_url, state) = spawn_content_server().await;
    let client = ContentClient::new(ContentServiceConfig::new(
        base_url,
        Some("secret-token".into()),
    ));

    let payload = client
        .fetch_collection("products", &CollectionQuery::populate("image"))
        .await
        .expect("fetch");
    assert_eq!(payload["data"][0]["name"], "Coke");

    let captured = state.captured.lock().await;
    assert_eq!(captured.len(), 1);
    assert_eq!(
        captured[0].query.get("populate").map(String::as_str),
        Some("image")
    );
    assert_eq!(
        captured[0].authorization.as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn fetch_collection_without_token_is_unauthenticated() {
    let (base_url, state) = spawn_content_server().await;
    let client = ContentClient::new(ContentServiceConfig::new(base_url, None));

    client
        .fetch_collection("products", &CollectionQuery::default())
        .await
        .expect("fetch");

    let captured = state.captured.lock().await;
    assert_eq!(captured[0].authorization, None);
    assert!(captured[0].query.is_empty());
}

#[tokio::test]
async fn fetch_collection_maps_non_success_status_to_service_error() {
    let (base_url, _state) = spawn_content_server().await;
    let client = ContentClient::new(ContentServiceConfig::new(base_url, None));

    let err = client
        .fetch_collection("campaigns", &CollectionQuery::default())
        .await
        .expect_err("500 must fail");
    assert_eq!(err, FetchError::ServiceError { status_code: 500 });
}

#[tokio::test]
async fn fetch_collection_flags_non_json_body_as_malformed() {
    let (base_url, _state) = spawn_content_server().await;
    let client = ContentClient::new(ContentServiceConfig::new(base_url, None));

    let err = client
        .fetch_collection("pages", &CollectionQuery::default())
        .await
        .expect_err("html body must fail");
    assert_eq!(err.kind(), FetchErrorKind::MalformedPayload);
}

#[tokio::test]
async fn fetch_collection_reports_network_failure_when_unreachable() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = ContentClient::new(ContentServiceConfig::new(format!("http://{addr}"), None));
    let err = client
        .fetch_collection("products", &CollectionQuery::default())
        .await
        .expect_err("closed port must fail");
    assert_eq!(err.kind(), FetchErrorKind::NetworkFailure);
}

#[tokio::test]
async fn submit_record_wraps_fields_in_data_envelope() {
    let (base_url, state) = spawn_content_server().await;
    let client = ContentClient::new(ContentServiceConfig::new(base_url, Some("t".into())));

    let mut payload = RecordPayload::new();
    payload.insert("name".into(), "Ada".into());
    payload.insert("email".into(), "ada@example.com".into());
    payload.insert("message".into(), "Hello".into());

    client
        .submit_record("contacts", &payload)
        .await
        .expect("submit");

    let captured = state.captured.lock().await;
    assert_eq!(
        captured[0].body,
        Some(json!({
            "data": { "name": "Ada", "email": "ada@example.com", "message": "Hello" }
        }))
    );
    assert_eq!(
        captured[0].content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(captured[0].authorization.as_deref(), Some("Bearer t"));
}

#[tokio::test]
async fn submit_record_maps_rejection_to_service_error() {
    let (base_url, _state) = spawn_content_server().await;
    let client = ContentClient::new(ContentServiceConfig::new(base_url, None));

    let err = client
        .submit_record("newsletters", &RecordPayload::new())
        .await
        .expect_err("500 must fail");
    assert_eq!(err.status_code(), Some(500));
}
