//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at boot
//! - Respect RUST_LOG, falling back to the configured filter

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber. Call once, before serving.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
