//! Checkout Relay Server - Main Entry Point
//!
//! Verifies webhook events from the workflow backend and streams them to
//! waiting browser sessions.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use cr_server::{api, config, relay::SessionRegistry, upstream::WorkflowClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cr_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Checkout Relay Server"
    );

    if config.webhook_secret.is_none() {
        tracing::warn!("WEBHOOK_SECRET is not set; inbound webhooks will be rejected");
    }

    // Shared session registry for live event streams
    let registry = Arc::new(SessionRegistry::new(config.session_queue_depth));

    // Client for the workflow-automation backend
    let workflow = WorkflowClient::new(&config)?;

    // Build application state and router
    let state = api::AppState::new(config.clone(), registry, workflow);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
