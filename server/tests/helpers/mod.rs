//! Reusable test helpers for HTTP integration tests.
//!
//! Builds the full axum router around an in-memory session registry and
//! sends requests through it with `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use cr_server::api::{create_router, AppState};
use cr_server::config::Config;
use cr_server::relay::SessionRegistry;
use cr_server::upstream::WorkflowClient;

/// Build a router plus the state behind it, so tests can reach the registry
/// directly (e.g. to open a session stream out-of-band).
pub fn test_app_with(config: Config) -> (Router, AppState) {
    let registry = Arc::new(SessionRegistry::new(config.session_queue_depth));
    let workflow = WorkflowClient::new(&config).expect("Failed to build workflow client");
    let state = AppState::new(config, registry, workflow);
    (create_router(state.clone()), state)
}

/// Build a router with the default test configuration.
pub fn test_app() -> (Router, AppState) {
    test_app_with(Config::default_for_test())
}

/// Send one request through the router.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("Request failed")
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Body was not JSON")
}
