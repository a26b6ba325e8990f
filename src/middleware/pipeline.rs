//! Ordered, short-circuiting middleware execution.

use std::sync::Arc;

use super::{ControlSignal, Middleware};
use crate::errors::DispatchError;
use crate::http::context::RequestContext;
use crate::http::response::ResponseBuilder;

/// Run `chain` in order. Returns `Halt` as soon as one middleware halts;
/// a middleware error becomes an `Unhandled` dispatch fault.
pub fn run(
    chain: &[Arc<dyn Middleware>],
    ctx: &mut RequestContext,
    res: &mut ResponseBuilder,
) -> Result<ControlSignal, DispatchError> {
    for (position, middleware) in chain.iter().enumerate() {
        match middleware.handle(ctx, res) {
            Ok(ControlSignal::Continue) => {}
            Ok(ControlSignal::Halt) => {
                tracing::debug!(position, path = ctx.path(), "middleware halted pipeline");
                return Ok(ControlSignal::Halt);
            }
            Err(err) => {
                tracing::error!(position, path = ctx.path(), error = %err, "middleware fault");
                return Err(DispatchError::Unhandled(err.to_string()));
            }
        }
    }
    Ok(ControlSignal::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::middleware_fn;
    use axum::http::Method;
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/x")
    }

    #[test]
    fn runs_chain_in_order_and_attributes_flow_forward() {
        let first = middleware_fn(|ctx, _res| {
            ctx.set_attribute("seen", json!(["first"]));
            Ok(ControlSignal::Continue)
        });
        let second = middleware_fn(|ctx, _res| {
            let mut seen = ctx
                .attribute("seen")
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default();
            seen.push(json!("second"));
            ctx.set_attribute("seen", json!(seen));
            Ok(ControlSignal::Continue)
        });

        let mut ctx = ctx();
        let mut res = ResponseBuilder::new();
        let signal = run(&[first, second], &mut ctx, &mut res).unwrap();
        assert_eq!(signal, ControlSignal::Continue);
        assert_eq!(ctx.attribute("seen"), Some(&json!(["first", "second"])));
    }

    #[test]
    fn halt_stops_the_chain() {
        let halter = middleware_fn(|_ctx, res| {
            res.set_status(axum::http::StatusCode::UNAUTHORIZED);
            Ok(ControlSignal::Halt)
        });
        let unreachable = middleware_fn(|ctx, _res| {
            ctx.set_attribute("reached", json!(true));
            Ok(ControlSignal::Continue)
        });

        let mut ctx = ctx();
        let mut res = ResponseBuilder::new();
        let signal = run(&[halter, unreachable], &mut ctx, &mut res).unwrap();
        assert_eq!(signal, ControlSignal::Halt);
        assert!(ctx.attribute("reached").is_none());
        assert_eq!(res.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn middleware_error_becomes_unhandled_fault() {
        let failing = middleware_fn(|_ctx, _res| Err("boom".into()));
        let mut ctx = ctx();
        let mut res = ResponseBuilder::new();
        let err = run(&[failing], &mut ctx, &mut res).unwrap_err();
        assert!(matches!(err, DispatchError::Unhandled(ref msg) if msg == "boom"));
    }
}
