//! Checkout Relay Server
//!
//! Backend for automated checkout runs: verifies HMAC-signed webhook events
//! from the workflow-automation backend and relays each one to the matching
//! browser session over a live event stream.

pub mod api;
pub mod checkout;
pub mod config;
pub mod relay;
pub mod upstream;
pub mod webhook;
