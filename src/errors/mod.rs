//! Error taxonomy and failure rendering.
//!
//! # Data Flow
//! ```text
//! Request-time fault (no match / binding / middleware / handler)
//!     → DispatchError (caught at the Dispatcher boundary)
//!     → ErrorPayload (message list + status code)
//!     → reporter.rs (negotiate representation, render body)
//! ```
//!
//! # Design Decisions
//! - Pattern errors are separate (`pattern::PatternError`) and fatal at boot
//! - Request-time faults never escape the dispatcher unformatted
//! - `Unhandled` carries detail that is only shown in development mode

pub mod reporter;

pub use reporter::{ErrorMessage, ErrorPayload, ErrorReporter, ReportType};

use axum::http::StatusCode;
use thiserror::Error;

/// Boxed error type middleware and handlers may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A fault raised while dispatching one request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no route matches {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("no value available for handler parameter `{name}`")]
    UnresolvedParameter { name: String },

    #[error("{0}")]
    Unhandled(String),
}

impl DispatchError {
    /// HTTP status the ErrorReporter renders for this fault.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::UnresolvedParameter { .. } | Self::Unhandled(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        Self::Unhandled(err.to_string())
    }
}
