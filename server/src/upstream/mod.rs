//! Outbound Collaborators
//!
//! Thin clients for the services this server forwards to: the
//! workflow-automation backend and the postcode lookup API. Pure
//! request-shaping glue; the relay core never depends on their internals.

pub mod client;
pub mod postcode;

pub use client::{RunSession, UpstreamError, WorkflowClient};
