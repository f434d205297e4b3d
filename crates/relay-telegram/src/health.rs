//! Liveness endpoint for hosting platforms that expect an open HTTP port.

use axum::{routing::get, Router};
use tracing::info;

pub const HEALTH_BODY: &str = "Bot is running";

pub fn app() -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
}

async fn health_handler() -> &'static str {
    HEALTH_BODY
}

/// Serve the liveness endpoint on `0.0.0.0:port` until the process exits.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "health endpoint listening");
    axum::serve(listener, app()).await?;
    Ok(())
}
