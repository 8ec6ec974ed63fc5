//! Shared harness for the HTTP contract tests
//!
//! Builds the full router over a fresh in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tooldir_server::auth::issue_token;
use tooldir_server::{build_router, AppConfig, AppState, AuthConfig, MemoryStore, Stores};
use tower::ServiceExt;

pub const SECRET: &str = "contract-test-secret";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

pub fn build_app() -> TestApp {
    build_app_with(AppConfig {
        auth: AuthConfig {
            jwt_secret: SECRET.into(),
        },
        ..Default::default()
    })
}

pub fn build_app_with(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(Stores::memory(store.clone()), &config);
    TestApp {
        app: build_router(Arc::new(state), &config.server),
        store,
    }
}

pub fn token_for(user: &str) -> String {
    issue_token(SECRET, user, chrono::Duration::hours(1)).unwrap()
}

pub fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", token_for(user)));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request; returns status and the parsed body (`Null` when empty).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}
