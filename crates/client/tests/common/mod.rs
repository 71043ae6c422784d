//! Common test utilities for integration tests.
//!
//! Spins an in-process stub of the DBIDS backend API on an ephemeral port,
//! with canned response bodies and full request capture, and builds clients
//! wired to it with an isolated session store.

#![allow(dead_code)]

use axum::extract::{Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use client::{ApiClient, Session, SessionStore};
use domain::AdminProfile;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_ADMIN_ID: &str = "7c9a1d8e-44c5-4b52-9c30-5f8f2a3c1111";
pub const TEST_EMAIL: &str = "admin@example.com";
pub const TEST_TOKEN: &str = "tok-abc";

/// One captured inbound request.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub query: String,
    pub admin_email: Option<String>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

/// Shared, mutable stub configuration and capture log.
#[derive(Clone)]
pub struct StubState {
    pub requests: Arc<Mutex<Vec<Captured>>>,
    pub logs_body: Arc<Mutex<Value>>,
    pub user_summary_body: Arc<Mutex<Value>>,
    pub hour_summary_body: Arc<Mutex<Value>>,
    pub events_body: Arc<Mutex<Value>>,
    pub event_detail_body: Arc<Mutex<Option<Value>>>,
    pub settings_body: Arc<Mutex<Value>>,
    pub login_response: Arc<Mutex<(u16, Value)>>,
    pub unauthorized: Arc<AtomicBool>,
    pub stream_body: Arc<Mutex<String>>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            requests: Arc::default(),
            logs_body: Arc::new(Mutex::new(json!({
                "content": [], "page": 0, "size": 20, "totalElements": 0, "totalPages": 1
            }))),
            user_summary_body: Arc::new(Mutex::new(json!({ "users": [] }))),
            hour_summary_body: Arc::new(Mutex::new(json!({ "times": [] }))),
            events_body: Arc::new(Mutex::new(json!([]))),
            event_detail_body: Arc::new(Mutex::new(None)),
            settings_body: Arc::new(Mutex::new(json!({ "email": TEST_EMAIL }))),
            login_response: Arc::new(Mutex::new((
                200,
                json!({
                    "adminId": TEST_ADMIN_ID,
                    "email": TEST_EMAIL,
                    "role": "DBA",
                    "accessToken": TEST_TOKEN
                }),
            ))),
            unauthorized: Arc::new(AtomicBool::new(false)),
            stream_body: Arc::new(Mutex::new(String::new())),
        }
    }
}

impl StubState {
    fn capture(
        &self,
        method: &str,
        path: &str,
        query: Option<String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        self.requests.lock().unwrap().push(Captured {
            method: method.to_string(),
            path: path.to_string(),
            query: query.unwrap_or_default(),
            admin_email: header(headers, "x-admin-email"),
            bearer: header(headers, "authorization"),
            body,
        });
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    pub fn captured_for(&self, path: &str) -> Vec<Captured> {
        self.captured()
            .into_iter()
            .filter(|c| c.path == path)
            .collect()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

pub struct ApiStub {
    pub addr: SocketAddr,
    pub state: StubState,
}

/// Starts the stub server; it lives for the rest of the test process.
pub async fn spawn_stub(state: StubState) -> ApiStub {
    let app = Router::new()
        .route("/api/auth/login", axum::routing::post(login))
        .route("/api/auth/logout", axum::routing::post(logout))
        .route("/api/logs", get(list_logs))
        .route("/api/logs/summary", get(summary))
        .route("/api/logs/export", get(export))
        .route("/api/events", get(list_events))
        .route("/api/events/stream", get(stream))
        .route("/api/events/:id", get(event_detail))
        .route("/api/settings/alerts", get(get_settings).patch(patch_settings))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });

    ApiStub { addr, state }
}

/// A client with an isolated session store under `dir`, not logged in.
pub fn test_client(addr: SocketAddr, dir: &tempfile::TempDir) -> Arc<ApiClient> {
    let session = Arc::new(Session::init(SessionStore::new(
        dir.path().join("profile.json"),
    )));
    Arc::new(
        ApiClient::new(&format!("http://{}", addr), Duration::from_secs(5), session)
            .expect("build client"),
    )
}

/// A client with a stored profile, as after a successful login.
pub fn seeded_client(addr: SocketAddr, dir: &tempfile::TempDir) -> Arc<ApiClient> {
    let client = test_client(addr, dir);
    client
        .session()
        .login(test_profile())
        .expect("seed session");
    client
}

pub fn test_profile() -> AdminProfile {
    AdminProfile {
        admin_id: TEST_ADMIN_ID.parse().expect("valid test uuid"),
        email: TEST_EMAIL.to_string(),
        name: None,
        role: None,
        access_token: Some(TEST_TOKEN.to_string()),
        expires_at: None,
        last_login: None,
    }
}

fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "UNAUTHORIZED" })),
    )
        .into_response()
}

async fn login(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.capture("POST", "/api/auth/login", None, &headers, Some(body));
    let (status, value) = state.login_response.lock().unwrap().clone();
    (
        StatusCode::from_u16(status).expect("valid stub status"),
        Json(value),
    )
        .into_response()
}

async fn logout(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.capture("POST", "/api/auth/logout", None, &headers, None);
    Json(json!({ "status": "LOGGED_OUT" })).into_response()
}

async fn list_logs(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.capture("GET", "/api/logs", query, &headers, None);
    if state.unauthorized.load(Ordering::Relaxed) {
        return unauthorized_response();
    }
    Json(state.logs_body.lock().unwrap().clone()).into_response()
}

async fn summary(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.capture("GET", "/api/logs/summary", query, &headers, None);
    if state.unauthorized.load(Ordering::Relaxed) {
        return unauthorized_response();
    }
    let body = match params.get("by").map(String::as_str) {
        Some("hour") => state.hour_summary_body.lock().unwrap().clone(),
        _ => state.user_summary_body.lock().unwrap().clone(),
    };
    Json(body).into_response()
}

async fn export(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.capture("GET", "/api/logs/export", query, &headers, None);
    if state.unauthorized.load(Ordering::Relaxed) {
        return unauthorized_response();
    }
    (
        [
            (
                axum::http::header::CONTENT_DISPOSITION,
                "attachment; filename=\"query_logs_stub.csv\"",
            ),
            (axum::http::header::CONTENT_TYPE, "text/csv;charset=UTF-8"),
        ],
        "id,userId,status\nq1,alice,SUCCESS\n",
    )
        .into_response()
}

async fn list_events(
    State(state): State<StubState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.capture("GET", "/api/events", query, &headers, None);
    if state.unauthorized.load(Ordering::Relaxed) {
        return unauthorized_response();
    }
    Json(state.events_body.lock().unwrap().clone()).into_response()
}

async fn event_detail(
    State(state): State<StubState>,
    axum::extract::Path(id): axum::extract::Path<String>,
    headers: HeaderMap,
) -> Response {
    state.capture("GET", &format!("/api/events/{}", id), None, &headers, None);
    match state.event_detail_body.lock().unwrap().clone() {
        Some(body) => Json(body).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "NOT_FOUND" })),
        )
            .into_response(),
    }
}

async fn stream(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.capture("GET", "/api/events/stream", None, &headers, None);
    if state.unauthorized.load(Ordering::Relaxed) {
        return unauthorized_response();
    }
    state.stream_body.lock().unwrap().clone().into_response()
}

async fn get_settings(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.capture("GET", "/api/settings/alerts", None, &headers, None);
    if state.unauthorized.load(Ordering::Relaxed) {
        return unauthorized_response();
    }
    Json(state.settings_body.lock().unwrap().clone()).into_response()
}

async fn patch_settings(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.capture("PATCH", "/api/settings/alerts", None, &headers, Some(body));
    if state.unauthorized.load(Ordering::Relaxed) {
        return unauthorized_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
