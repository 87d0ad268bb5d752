//! Session Event Relay
//!
//! Routes verified webhook events to the browser session waiting on them.
//! A session registry maps opaque session identifiers to per-session FIFO
//! channels; delivery enqueues or drops, and the stream side drains the
//! channel into a long-lived SSE response.

pub mod deliver;
pub mod handlers;
pub mod registry;
pub mod stream;

pub use deliver::{deliver, DeliveryOutcome};
pub use registry::{SessionRegistry, Subscription};
pub use stream::EventStream;

/// A verified event from the workflow backend, relayed as-is.
pub type Event = serde_json::Value;
