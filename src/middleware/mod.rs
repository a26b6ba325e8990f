//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! Matched RouteEntry.middleware (scope chain + entry chain)
//!     → pipeline.rs (run each in order)
//!     → Continue: next middleware, then the handler
//!     → Halt: stop, send whatever response state exists
//!     → Err: Unhandled fault, rendered by the ErrorReporter
//! ```
//!
//! # Design Decisions
//! - Middleware are statically resolved trait objects bound at
//!   registration; nothing is looked up by name at call time
//! - Sequential execution within a request: later middleware may depend
//!   on attributes set by earlier ones
//! - `Halt` is a controlled short-circuit, never an error

pub mod pipeline;

use std::sync::Arc;

use crate::errors::BoxError;
use crate::http::context::RequestContext;
use crate::http::response::ResponseBuilder;

/// What a middleware tells the pipeline to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Proceed to the next middleware (or the handler).
    Continue,
    /// Stop the chain; the current response state is sent as-is.
    Halt,
}

/// An interceptor run before the target handler.
pub trait Middleware: Send + Sync {
    fn handle(
        &self,
        ctx: &mut RequestContext,
        res: &mut ResponseBuilder,
    ) -> Result<ControlSignal, BoxError>;
}

struct MiddlewareFn<F>(F);

impl<F> Middleware for MiddlewareFn<F>
where
    F: Fn(&mut RequestContext, &mut ResponseBuilder) -> Result<ControlSignal, BoxError>
        + Send
        + Sync,
{
    fn handle(
        &self,
        ctx: &mut RequestContext,
        res: &mut ResponseBuilder,
    ) -> Result<ControlSignal, BoxError> {
        (self.0)(ctx, res)
    }
}

/// Wrap a closure as a middleware.
pub fn middleware_fn<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(&mut RequestContext, &mut ResponseBuilder) -> Result<ControlSignal, BoxError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(MiddlewareFn(f))
}
