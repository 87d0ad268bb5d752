//! Checkout API
//!
//! Request-shaping endpoints that start checkout runs on the workflow
//! backend and forward run-scoped follow-ups (failure reports, user input).

pub mod handlers;
pub mod types;
