//! Event Delivery
//!
//! Routes one verified event to the channel of its session, or drops it.
//! Never blocks and never fails the caller: a missing subscriber is the
//! expected case when the browser disconnected or never connected.

use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use super::{Event, SessionRegistry};

/// What happened to a delivered event. Only observable via logs in
/// production; the webhook sender already got its acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Enqueued to a live session stream.
    Delivered,
    /// No stream registered (or it closed mid-delivery); event dropped.
    NoSubscriber,
    /// The session's queue is at capacity; event dropped.
    QueueFull,
    /// The event carries no session identifier at the configured path.
    MissingSessionId,
}

/// Read the session identifier out of an event by walking a dot-separated
/// field path (e.g. `payload.session_id`).
pub fn extract_session_id<'a>(event: &'a Event, path: &str) -> Option<&'a str> {
    path.split('.')
        .try_fold(event, |value, key| value.get(key))
        .and_then(serde_json::Value::as_str)
}

/// Deliver a verified event to the stream of its session.
pub fn deliver(registry: &SessionRegistry, event: Event, session_id_path: &str) -> DeliveryOutcome {
    let Some(session_id) = extract_session_id(&event, session_id_path).map(str::to_owned) else {
        warn!(
            path = session_id_path,
            "Verified event carries no session identifier"
        );
        return DeliveryOutcome::MissingSessionId;
    };

    let Some(tx) = registry.lookup(&session_id) else {
        debug!(%session_id, "No active stream for session, dropping event");
        return DeliveryOutcome::NoSubscriber;
    };

    match tx.try_send(event) {
        Ok(()) => {
            debug!(%session_id, "Event enqueued for session stream");
            DeliveryOutcome::Delivered
        }
        Err(TrySendError::Full(_)) => {
            warn!(%session_id, "Session queue full, dropping event");
            DeliveryOutcome::QueueFull
        }
        Err(TrySendError::Closed(_)) => {
            debug!(%session_id, "Session stream closed mid-delivery, dropping event");
            DeliveryOutcome::NoSubscriber
        }
    }
}
