//! Lumynus routing and dispatch core.
//!
//! # Architecture Overview
//!
//! ```text
//! Boot:
//!     RouteTable::register(...)        pattern compiler + scope stack
//!         → Dispatcher::new(table)     table frozen, injected by ownership
//!         → HttpServer::new(..)        axum catch-all + layers
//!
//! Per request:
//!     axum request
//!         → http::server (RequestContext built, request ID assigned)
//!         → dispatch::Dispatcher
//!             match → middleware pipeline → parameter binding → handler
//!         → http::ResponseBuilder (one terminal action)
//!         → errors::ErrorReporter on no-match or any fault
//!         → axum response
//! ```

// Core subsystems
pub mod dispatch;
pub mod errors;
pub mod http;
pub mod middleware;
pub mod pattern;
pub mod routing;
pub mod session;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use dispatch::{handler_fn, Dispatcher, Handler, ParamSpec};
pub use errors::{DispatchError, ErrorPayload, ErrorReporter, ReportType};
pub use http::{HttpServer, RequestContext, ResponseBody, ResponseBuilder};
pub use middleware::{middleware_fn, ControlSignal, Middleware};
pub use pattern::{PatternError, RoutePattern};
pub use routing::RouteTable;
