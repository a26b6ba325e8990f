//! Handler parameter resolution.
//!
//! # Responsibilities
//! - Resolve each declared parameter, in order: path capture, then
//!   context attribute, then declared default
//! - Fail with `UnresolvedParameter` when a required parameter has no
//!   source
//!
//! # Design Decisions
//! - No coercion here: the pattern's type constraint already validated
//!   and typed the capture
//! - Optional parameters with no source bind as `None`, not as an error

use serde_json::Value;

use crate::errors::DispatchError;
use crate::http::context::RequestContext;

use super::ParamSpec;

/// Resolve `specs` against the matched request. The result aligns with
/// `specs` by index.
pub fn bind(
    specs: &[ParamSpec],
    ctx: &RequestContext,
) -> Result<Vec<Option<Value>>, DispatchError> {
    specs
        .iter()
        .map(|spec| {
            let resolved = ctx
                .path_param(&spec.name)
                .or_else(|| ctx.attribute(&spec.name))
                .cloned()
                .or_else(|| spec.default.clone());
            match resolved {
                Some(value) => Ok(Some(value)),
                None if spec.required => Err(DispatchError::UnresolvedParameter {
                    name: spec.name.clone(),
                }),
                None => Ok(None),
            }
        })
        .collect()
}
