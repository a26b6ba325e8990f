//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext
//!     → dispatcher.rs (match → middleware → bind → invoke)
//!     → binder.rs (resolve declared handler parameters)
//!     → handler.invoke(ctx, args, res)
//!     → ResponseBuilder (or ErrorReporter output on any fault)
//! ```
//!
//! # Design Decisions
//! - Handlers declare their parameters at registration time; there is no
//!   runtime reflection
//! - The context is the implicit first argument of every handler
//! - Every dispatch terminates in exactly one rendered response

pub mod binder;
pub mod dispatcher;

pub use dispatcher::Dispatcher;

use std::sync::Arc;

use serde_json::Value;

use crate::errors::BoxError;
use crate::http::context::RequestContext;
use crate::http::response::ResponseBuilder;

/// One declared handler parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParamSpec {
    /// A parameter that must resolve from a path capture or an attribute.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            default: None,
        }
    }

    /// A parameter that binds as absent when nothing provides it.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: None,
        }
    }

    /// A parameter with a declared default value.
    pub fn with_default(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            required: false,
            default: Some(default),
        }
    }
}

/// Target of a route: the controller action the dispatcher invokes after
/// middleware and binding.
pub trait Handler: Send + Sync {
    /// Parameters to resolve, in declaration order. The context itself is
    /// not listed; it is always passed first.
    fn params(&self) -> &[ParamSpec] {
        &[]
    }

    /// Invoke the handler. `args` aligns with `params()`; an entry is
    /// `None` only for an optional parameter nothing resolved.
    fn invoke(
        &self,
        ctx: &mut RequestContext,
        args: &[Option<Value>],
        res: &mut ResponseBuilder,
    ) -> Result<(), BoxError>;
}

struct HandlerFn<F> {
    params: Vec<ParamSpec>,
    f: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut RequestContext, &[Option<Value>], &mut ResponseBuilder) -> Result<(), BoxError>
        + Send
        + Sync,
{
    fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    fn invoke(
        &self,
        ctx: &mut RequestContext,
        args: &[Option<Value>],
        res: &mut ResponseBuilder,
    ) -> Result<(), BoxError> {
        (self.f)(ctx, args, res)
    }
}

/// Wrap a closure and its parameter declarations as a handler.
pub fn handler_fn<F>(params: Vec<ParamSpec>, f: F) -> Arc<dyn Handler>
where
    F: Fn(&mut RequestContext, &[Option<Value>], &mut ResponseBuilder) -> Result<(), BoxError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(HandlerFn { params, f })
}
