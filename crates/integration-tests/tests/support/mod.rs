#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use api_server::http::{AppState, build_router};
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use shared::chat::{AnswerResolver, ConversationRouter, RelevanceConfig};
use shared::lookup::{PageSummary, StubLookupClient};
use shared::profiles::ProfileStore;
use tempfile::TempDir;
use tower::ServiceExt;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

pub struct TestApp {
    pub app: axum::Router,
    pub client: Arc<StubLookupClient>,
    pub store_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn start(client: StubLookupClient) -> Self {
        Self::start_with_history_limit(client, DEFAULT_HISTORY_LIMIT)
    }

    pub fn start_with_history_limit(client: StubLookupClient, history_limit: usize) -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let store_path = dir.path().join("users_data.json");
        let client = Arc::new(client);
        let app = build_test_router(client.clone(), &store_path, history_limit);

        Self {
            app,
            client,
            store_path,
            _dir: dir,
        }
    }

    /// A second router over the same profile file, with fresh in-memory state.
    pub fn reopen(&self) -> axum::Router {
        build_test_router(self.client.clone(), &self.store_path, DEFAULT_HISTORY_LIMIT)
    }
}

pub fn build_test_router(
    client: Arc<StubLookupClient>,
    store_path: &Path,
    history_limit: usize,
) -> axum::Router {
    let answers = AnswerResolver::new(client, RelevanceConfig::default());
    build_router(AppState::new(
        ProfileStore::open(store_path),
        ConversationRouter::new(answers),
        history_limit,
    ))
}

pub fn gravity_client() -> StubLookupClient {
    StubLookupClient::new().with_summary(
        "Gravity",
        PageSummary::new(
            "Gravity",
            "Gravity is a fundamental interaction which causes mutual attraction between all things that have mass.",
        )
        .with_page_url("https://en.wikipedia.org/wiki/Gravity"),
    )
}

pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
    pub session_cookie: Option<String>,
    pub request_id: Option<String>,
}

pub async fn send_json(app: &axum::Router, request: Request<Body>) -> JsonResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should succeed");
    let status = response.status();
    let session_cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with("chat_session="))
        .map(ToString::to_string);
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should read");
    let body = serde_json::from_slice::<Value>(&body).unwrap_or_else(|_| json!({}));

    JsonResponse {
        status,
        body,
        session_cookie,
        request_id,
    }
}

pub fn request(
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    json_body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    match json_body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

/// Opens a session and returns its cookie pair (`chat_session=<id>`).
pub async fn open_session(app: &axum::Router) -> String {
    let response = send_json(app, request(Method::GET, "/v1/session", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    response
        .session_cookie
        .expect("session cookie should be issued")
}

pub async fn chat(app: &axum::Router, cookie: &str, message: &str) -> JsonResponse {
    send_json(
        app,
        request(
            Method::POST,
            "/v1/chat",
            Some(cookie),
            Some(json!({ "message": message })),
        ),
    )
    .await
}

pub async fn history(app: &axum::Router, cookie: &str) -> Vec<Value> {
    let response = send_json(app, request(Method::GET, "/v1/history", Some(cookie), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["history"]
        .as_array()
        .cloned()
        .expect("history should be an array")
}
