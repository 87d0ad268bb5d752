//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    checkout,
    config::Config,
    relay::{self, SessionRegistry},
    upstream::WorkflowClient,
    webhook,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Registry of live session streams
    pub registry: Arc<SessionRegistry>,
    /// Client for the workflow-automation backend
    pub workflow: WorkflowClient,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(config: Config, registry: Arc<SessionRegistry>, workflow: WorkflowClient) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            workflow,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    // Restrict CORS to the configured browser origin; fall back to permissive
    // (no credentials either way, the API carries no cookies).
    let cors = match state
        .config
        .allow_origin
        .as_deref()
        .and_then(|o| o.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Inbound events from the workflow backend
        .route("/webhook", post(webhook::handlers::receive_webhook))
        // Live event stream for one session
        .route("/status/{session_id}", get(relay::handlers::status_stream))
        // Outbound calls to the workflow backend
        .route("/checkout", post(checkout::handlers::trigger_checkout))
        .route(
            "/run/{session_id}/interrupt",
            post(checkout::handlers::interrupt_run),
        )
        .route(
            "/run/{session_id}/user_interaction",
            post(checkout::handlers::relay_user_interaction),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether webhook verification is configured
    webhook_verification: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        webhook_verification: state.config.webhook_secret.is_some(),
    })
}
