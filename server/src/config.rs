//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Browser origin allowed by CORS (all origins if unset)
    pub allow_origin: Option<String>,

    /// Shared secret for webhook HMAC verification.
    ///
    /// Optional at startup so the outbound endpoints keep working without it;
    /// every inbound webhook is rejected until it is set.
    pub webhook_secret: Option<String>,

    /// Base URL of the workflow-automation backend
    pub workflow_endpoint: String,

    /// API key sent to the workflow backend on every outbound call
    pub workflow_api_key: String,

    /// Dot-separated location of the session identifier inside a webhook
    /// event. The upstream schema has shipped both `payload.session_id` and
    /// `data.session_id`, so the path is configuration rather than code.
    pub session_id_path: String,

    /// Maximum number of undelivered events queued per session (default: 256)
    pub session_queue_depth: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            allow_origin: env::var("ALLOW_ORIGIN").ok(),
            webhook_secret: env::var("WEBHOOK_SECRET").ok(),
            workflow_endpoint: env::var("WORKFLOW_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:8000".into()),
            workflow_api_key: env::var("WORKFLOW_API_KEY")
                .context("WORKFLOW_API_KEY must be set")?,
            session_id_path: env::var("SESSION_ID_PATH")
                .unwrap_or_else(|_| "payload.session_id".into()),
            session_queue_depth: env::var("SESSION_QUEUE_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            allow_origin: None,
            webhook_secret: Some("test-secret".into()),
            workflow_endpoint: "http://localhost:8000".into(),
            workflow_api_key: "test-api-key".into(),
            session_id_path: "payload.session_id".into(),
            session_queue_depth: 256,
        }
    }
}
