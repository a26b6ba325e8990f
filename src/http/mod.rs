//! HTTP boundary subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route, request ID)
//!     → context.rs (RequestContext built from the parsed request)
//!     → [dispatch layer routes and invokes]
//!     → response.rs (ResponseBuilder, one terminal action)
//!     → server.rs (convert to an Axum response, send to client)
//! ```

pub mod context;
pub mod response;
pub mod server;

pub use context::RequestContext;
pub use response::{ResponseBody, ResponseBuilder};
pub use server::HttpServer;
