//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Boot:
//!     register("hello/{name}[string]", handler)
//!     → pattern compiler (cached per string)
//!     → RouteEntry appended, scope middleware prepended
//!     → table handed by value to the Dispatcher (frozen)
//!
//! Per request:
//!     (method, path)
//!     → matcher.rs (registration-order scan, typed captures)
//!     → RouteMatch or no-match
//! ```
//!
//! # Design Decisions
//! - Write-once-then-read-only: no locking on the match path
//! - Registration order is the only ordering; first match wins
//! - Multiple independent tables per process (no global registry)

pub mod matcher;
pub mod table;

pub use matcher::{match_request, RouteMatch};
pub use table::{RouteEntry, RouteTable};
