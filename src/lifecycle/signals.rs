//! OS signal handling.
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Ctrl+C triggers graceful shutdown of the serving loop

/// Wait for the shutdown signal (Ctrl+C).
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
