//! Session Registry
//!
//! Process-wide map from session identifier to the channel feeding that
//! session's live stream. `DashMap` serializes insert/remove while lookups
//! stay concurrent. Entries live exactly as long as one subscription.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

use super::Event;

/// Registry entry: the sending half of a session's channel, tagged with the
/// registration that owns it.
struct SessionEntry {
    token: u64,
    tx: mpsc::Sender<Event>,
}

/// One open registration: the receiving half of the session's channel plus
/// the token needed to deregister it.
pub struct Subscription {
    pub(crate) session_id: String,
    pub(crate) token: u64,
    pub(crate) rx: mpsc::Receiver<Event>,
}

/// Thread-safe map of live sessions.
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    next_token: AtomicU64,
    queue_depth: usize,
}

impl SessionRegistry {
    /// Create an empty registry whose per-session channels hold at most
    /// `queue_depth` undelivered events.
    #[must_use]
    pub fn new(queue_depth: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            next_token: AtomicU64::new(0),
            queue_depth: queue_depth.max(1),
        }
    }

    /// Register a fresh channel for `session_id` and return its receiving
    /// half.
    ///
    /// A second registration for the same identifier force-closes the
    /// previous one: the old sender is dropped here, so the old stream
    /// drains whatever is already queued and then ends.
    pub fn register(&self, session_id: &str) -> Subscription {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.queue_depth);

        let previous = self
            .sessions
            .insert(session_id.to_owned(), SessionEntry { token, tx });
        if previous.is_some() {
            debug!(%session_id, "Replaced existing session stream");
        }

        Subscription {
            session_id: session_id.to_owned(),
            token,
            rx,
        }
    }

    /// Sender for the session's channel, if one is live. Non-mutating;
    /// absence means "drop silently", never an error.
    pub fn lookup(&self, session_id: &str) -> Option<mpsc::Sender<Event>> {
        self.sessions.get(session_id).map(|entry| entry.tx.clone())
    }

    /// Remove the entry for `session_id` if it still belongs to `token`.
    ///
    /// The token guard makes cleanup idempotent and keeps a replaced stream,
    /// tearing down late, from evicting its successor. A no-op when the
    /// entry is already gone.
    pub fn deregister(&self, session_id: &str, token: u64) {
        self.sessions
            .remove_if(session_id, |_, entry| entry.token == token);
    }

    /// Whether a stream is currently registered for `session_id`.
    #[must_use]
    pub fn is_active(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    #[test]
    fn register_then_lookup() {
        let registry = SessionRegistry::new(8);
        let _sub = registry.register("abc");

        assert!(registry.lookup("abc").is_some());
        assert!(registry.lookup("xyz").is_none());
    }

    #[test]
    fn deregister_removes_entry() {
        let registry = SessionRegistry::new(8);
        let sub = registry.register("abc");

        registry.deregister("abc", sub.token);
        assert!(!registry.is_active("abc"));

        // Idempotent: deregistering again is a no-op.
        registry.deregister("abc", sub.token);
        assert!(!registry.is_active("abc"));
    }

    #[test]
    fn replacement_closes_previous_channel() {
        let registry = SessionRegistry::new(8);
        let mut first = registry.register("abc");
        let _second = registry.register("abc");

        // The first registration's sender was dropped on replacement.
        assert_eq!(first.rx.try_recv(), Err(TryRecvError::Disconnected));
        assert!(registry.is_active("abc"));
    }

    #[test]
    fn stale_deregister_does_not_evict_successor() {
        let registry = SessionRegistry::new(8);
        let first = registry.register("abc");
        let second = registry.register("abc");

        registry.deregister("abc", first.token);
        assert!(registry.is_active("abc"));

        registry.deregister("abc", second.token);
        assert!(!registry.is_active("abc"));
    }

    #[test]
    fn sessions_are_independent() {
        let registry = SessionRegistry::new(8);
        let sub_a = registry.register("abc");
        let _sub_b = registry.register("xyz");

        registry.deregister("abc", sub_a.token);
        assert!(!registry.is_active("abc"));
        assert!(registry.is_active("xyz"));
    }
}
