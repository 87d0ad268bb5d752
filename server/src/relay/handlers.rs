//! Session Stream Endpoint
//!
//! Long-lived SSE response carrying one message per verified event.

use axum::extract::{Path, State};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tracing::{info, instrument};

use super::stream::EventStream;
use crate::api::AppState;

/// GET /`status/{session_id}`
///
/// Opens the event stream for a session. Stays open until the client
/// disconnects or the server shuts down; the drop guard on [`EventStream`]
/// deregisters the session either way.
#[instrument(skip(state))]
pub async fn status_stream(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    info!(%session_id, "Session stream opened");

    let stream = EventStream::open(state.registry.clone(), &session_id)
        .map(|event| Ok(SseEvent::default().data(event.to_string())));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
