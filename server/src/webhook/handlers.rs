//! Webhook Endpoint
//!
//! Accepts signed events from the workflow backend. The response only
//! acknowledges verification; delivery to a session stream happens in a
//! spawned task and carries no guarantee that anyone is listening.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::{instrument, warn};

use super::verify::{self, VerifyError};
use crate::api::AppState;
use crate::relay;

/// Header carrying the payload signature, as `sha256=<hex>`.
pub const SIGNATURE_HEADER: &str = "X-HMAC-Signature";

/// Acknowledgment returned once verification passes.
#[derive(Serialize)]
pub struct WebhookAck {
    message: &'static str,
}

impl From<VerifyError> for (StatusCode, String) {
    fn from(err: VerifyError) -> Self {
        warn!("Webhook rejected: {}", err);
        (err.status(), err.to_string())
    }
}

/// POST /webhook
#[instrument(skip_all)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, (StatusCode, String)> {
    let secret = state
        .config
        .webhook_secret
        .as_deref()
        .ok_or(VerifyError::SecretNotConfigured)?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(VerifyError::MissingSignature)?;
    // Only the hex after the scheme prefix is part of the signature.
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);

    let event = verify::verify(&body, signature, secret)?;

    // Decouple delivery from the acknowledgment: a slow subscriber never
    // delays the response, and the sender owns its own retry policy.
    let registry = state.registry.clone();
    let session_id_path = state.config.session_id_path.clone();
    tokio::spawn(async move {
        relay::deliver(&registry, event, &session_id_path);
    });

    Ok(Json(WebhookAck {
        message: "Webhook received successfully.",
    }))
}
