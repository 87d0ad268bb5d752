//! Session Event Stream
//!
//! The long-lived per-session stream behind the SSE response. Registers the
//! session's channel on open and deregisters it on drop, which covers every
//! exit path: normal end, client disconnect, and server shutdown.

use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

use super::registry::{SessionRegistry, Subscription};
use super::Event;

/// Stream of verified events for one session.
///
/// Yields events in enqueue order, pending indefinitely while the channel is
/// empty. Ends when the registration is replaced by a newer stream for the
/// same session (the sender side closes).
pub struct EventStream {
    registry: Arc<SessionRegistry>,
    subscription: Subscription,
}

impl EventStream {
    /// Register `session_id` and open its event stream.
    pub fn open(registry: Arc<SessionRegistry>, session_id: &str) -> Self {
        let subscription = registry.register(session_id);
        Self {
            registry,
            subscription,
        }
    }

    /// Session this stream is bound to.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.subscription.session_id
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.subscription.rx.poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.registry
            .deregister(&self.subscription.session_id, self.subscription.token);
        debug!(
            session_id = %self.subscription.session_id,
            "Session stream closed, entry deregistered"
        );
    }
}
