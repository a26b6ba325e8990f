//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; the request ID flows through every
//!   dispatch log line
//! - Filter configurable via RUST_LOG with a config-file fallback

pub mod logging;
