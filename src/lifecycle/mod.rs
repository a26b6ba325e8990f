//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: load config → validate → register routes → bind listener
//! Shutdown: SIGINT/Ctrl+C → stop accepting → drain in-flight → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: a boot-time pattern or config error aborts startup
//! - Listeners start last (traffic only when the table is frozen)

pub mod signals;

pub use signals::shutdown_signal;
