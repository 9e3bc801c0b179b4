//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock collaborators injected, so the merge flow runs without network,
//! ffmpeg or a storage bucket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use reelmerge_core::{
    testing::{MockCommandRunner, MockFetcher, MockObjectStore, MockWorkspaceManager},
    Config, MergePipeline,
};
use reelmerge_server::state::{AppState, ProbeState};

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_merge() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/merge", json!({
///         "sources": ["https://cdn.example.com/a.mp4"]
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The merge service router
    pub router: Router,
    /// The probe service router, sharing `runner`
    pub probe_router: Router,
    pub fetcher: Arc<MockFetcher>,
    pub workspaces: Arc<MockWorkspaceManager>,
    pub runner: Arc<MockCommandRunner>,
    pub store: Arc<MockObjectStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
    pub content_type: Option<String>,
}

impl TestFixture {
    pub fn new() -> Self {
        let fetcher = Arc::new(MockFetcher::new());
        let workspaces = Arc::new(MockWorkspaceManager::new());
        let runner = Arc::new(MockCommandRunner::new());
        let store = Arc::new(MockObjectStore::new());

        let mut config = Config::default();
        config.storage.bucket = "mock-bucket".to_string();

        let pipeline = Arc::new(MergePipeline::new(
            fetcher.clone(),
            workspaces.clone(),
            runner.clone(),
            store.clone(),
        ));
        let state = Arc::new(AppState::new(config, pipeline));
        let router = reelmerge_server::api::create_router(state);

        let probe_state = Arc::new(ProbeState::new(runner.clone()));
        let probe_router = reelmerge_server::api::create_probe_router(probe_state);

        Self {
            router,
            probe_router,
            fetcher,
            workspaces,
            runner,
            store,
        }
    }

    /// Send a GET request to the merge service.
    pub async fn get(&self, path: &str) -> TestResponse {
        send(&self.router, "GET", path, None, None).await
    }

    /// Send a POST request with JSON body to the merge service.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let bytes = serde_json::to_vec(&body).unwrap();
        send(&self.router, "POST", path, Some(bytes), Some("application/json")).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str, content_type: &str) -> TestResponse {
        send(
            &self.router,
            "POST",
            path,
            Some(body.as_bytes().to_vec()),
            Some(content_type),
        )
        .await
    }

    /// Send a GET request to the probe service.
    pub async fn probe_get(&self, path: &str) -> TestResponse {
        send(&self.probe_router, "GET", path, None, None).await
    }

    /// Send an empty POST request to the probe service.
    pub async fn probe_post(&self, path: &str) -> TestResponse {
        send(&self.probe_router, "POST", path, None, None).await
    }
}

async fn send(
    router: &Router,
    method: &str,
    path: &str,
    body: Option<Vec<u8>>,
    content_type: Option<&str>,
) -> TestResponse {
    let mut request_builder = Request::builder().method(method).uri(path);
    if let Some(content_type) = content_type {
        request_builder = request_builder.header("Content-Type", content_type);
    }

    let body = body.map(Body::from).unwrap_or_else(Body::empty);
    let request = request_builder.body(body).unwrap();

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let body_bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();

    let text = String::from_utf8_lossy(&body_bytes).into_owned();
    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        body,
        text,
        content_type,
    }
}
