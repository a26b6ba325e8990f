//! Per-request orchestration.
//!
//! # State machine
//! ```text
//! Matching → MiddlewareRunning → Binding → Invoking → Responding
//!     Matching ──────────────▶ ErrorReporting   (no match)
//!     MiddlewareRunning ─────▶ Responding       (Halt)
//!     MiddlewareRunning/Binding/Invoking ─────▶ ErrorReporting (fault)
//! ```
//!
//! # Design Decisions
//! - The table is owned by value and injected; independent dispatchers
//!   with independent tables coexist in one process
//! - No fault escapes unrendered: every path ends in a handler response
//!   or an ErrorReporter response
//! - The completion hook runs exactly once per request, via a drop
//!   guard: success, halt, fault, and unwinding panic all fire it

use std::sync::Arc;

use crate::errors::{DispatchError, ErrorPayload, ErrorReporter};
use crate::http::context::RequestContext;
use crate::http::response::ResponseBuilder;
use crate::middleware::{pipeline, ControlSignal};
use crate::routing::{match_request, RouteMatch, RouteTable};

use super::binder;

/// Hook invoked once when a request finishes, however it finishes. Used
/// to release external per-request resources deterministically.
pub type CompletionHook = Arc<dyn Fn(&RequestContext) + Send + Sync>;

/// Owns the context for the duration of one dispatch and fires the
/// completion hook in `Drop`, so the hook runs even when a handler
/// panic unwinds through `dispatch`.
struct CompletionGuard {
    ctx: RequestContext,
    hook: Option<CompletionHook>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(hook) = self.hook.take() {
            hook(&self.ctx);
        }
    }
}

/// Routes one request through matching, middleware, binding, and
/// invocation, and guarantees a rendered response.
pub struct Dispatcher {
    table: RouteTable,
    reporter: ErrorReporter,
    development: bool,
    completion: Option<CompletionHook>,
}

impl Dispatcher {
    /// Take ownership of a fully built table. Registration ends here; the
    /// table is read-only for the dispatcher's lifetime, so concurrent
    /// requests match without locking.
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            reporter: ErrorReporter::new(),
            development: false,
            completion: None,
        }
    }

    /// Show fault detail in error bodies instead of a generic message.
    pub fn development(mut self, enabled: bool) -> Self {
        self.development = enabled;
        self
    }

    /// Register the always-run-once completion hook.
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestContext) + Send + Sync + 'static,
    {
        self.completion = Some(Arc::new(hook));
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Process one request to a terminal response. Never returns a fault.
    pub fn dispatch(&self, ctx: RequestContext) -> ResponseBuilder {
        let mut guard = CompletionGuard {
            ctx,
            hook: self.completion.clone(),
        };
        let mut res = ResponseBuilder::new();

        if let Err(fault) = self.run(&mut guard.ctx, &mut res) {
            self.render_fault(&guard.ctx, fault, &mut res);
        }
        res
    }

    fn run(
        &self,
        ctx: &mut RequestContext,
        res: &mut ResponseBuilder,
    ) -> Result<(), DispatchError> {
        // Matching
        let RouteMatch { entry, params } =
            match_request(self.table.entries(), ctx.method(), ctx.path()).ok_or_else(|| {
                DispatchError::RouteNotFound {
                    method: ctx.method().to_string(),
                    path: ctx.path().to_string(),
                }
            })?;
        ctx.set_path_params(params);

        // MiddlewareRunning
        if pipeline::run(entry.middleware(), ctx, res)? == ControlSignal::Halt {
            // Responding: whatever state the halting middleware left.
            return Ok(());
        }

        // Binding
        let args = binder::bind(entry.handler().params(), ctx)?;

        // Invoking
        entry
            .handler()
            .invoke(ctx, &args, res)
            .map_err(DispatchError::from)?;

        // Responding: a handler that wrote no terminal body still sends
        // the builder state, same as the halt default.
        Ok(())
    }

    fn render_fault(&self, ctx: &RequestContext, fault: DispatchError, res: &mut ResponseBuilder) {
        let status = fault.status().as_u16();
        let message = match &fault {
            DispatchError::RouteNotFound { .. } | DispatchError::UnresolvedParameter { .. } => {
                fault.to_string()
            }
            DispatchError::Unhandled(detail) => {
                if self.development {
                    detail.clone()
                } else {
                    "Internal server error".to_string()
                }
            }
        };

        tracing::warn!(
            method = %ctx.method(),
            path = ctx.path(),
            status,
            error = %fault,
            "request failed"
        );

        if res.is_terminated() {
            // A middleware already fired a terminal write before the
            // fault; the existing response is all we can send.
            tracing::error!(path = ctx.path(), "fault after terminal write; response kept");
            return;
        }

        self.reporter
            .report(&ErrorPayload::new(message, status), ctx.headers(), res);
    }
}
