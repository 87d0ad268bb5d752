//! Inbound Webhook Events
//!
//! HMAC-SHA256 verification of events posted by the workflow backend,
//! and the endpoint that accepts them.

pub mod handlers;
pub mod verify;
