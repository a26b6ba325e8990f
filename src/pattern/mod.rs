//! Route-pattern subsystem.
//!
//! # Data Flow
//! ```text
//! Pattern string ("posts/{id}[int]/[string slug]?")
//!     → compiler.rs (tokenize on '/', parse each token)
//!     → RoutePattern (ordered Segment list, immutable)
//!     → cached per pattern string inside the RouteTable
//! ```
//!
//! # Grammar
//! ```text
//! pattern  := token ("/" token)*
//! token    := param | tail | literal
//! param    := "{" name "}" type-tag? "?"?
//! tail     := "[" type WS name "]" "?"?
//! type-tag := "[" type "]"
//! type     := "string" | "int" | "float" | "bool" | "any"
//! name     := [A-Za-z_][A-Za-z0-9_]*
//! ```
//!
//! # Design Decisions
//! - Compilation is pure: no registry access, no I/O
//! - Optional parameters must be trailing (enforced at compile time)
//! - Malformed patterns are fatal at boot, never at request time

pub mod compiler;

pub use compiler::{compile, PatternCache};

use serde_json::Value;
use thiserror::Error;

/// Error raised while compiling a route pattern. Fatal at boot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("unmatched bracket in token `{token}` of pattern `{pattern}`")]
    UnmatchedBracket { pattern: String, token: String },

    #[error("unknown type tag `{tag}` in pattern `{pattern}`")]
    UnknownType { pattern: String, tag: String },

    #[error("invalid parameter name `{name}` in pattern `{pattern}`")]
    InvalidName { pattern: String, name: String },

    #[error("duplicate parameter `{name}` in pattern `{pattern}`")]
    DuplicateParam { pattern: String, name: String },

    #[error("required segment after optional segment in pattern `{pattern}`")]
    RequiredAfterOptional { pattern: String },
}

/// Type constraint attached to a parameter segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeConstraint {
    Str,
    Int,
    Float,
    Bool,
    Any,
}

impl TypeConstraint {
    /// Parse a type tag from the pattern DSL. Absent tags default to `Any`
    /// at the call site, so this only accepts the five known names.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::Str),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Validate a path segment against this constraint and capture it as a
    /// typed value. `None` means the segment fails the constraint, which
    /// fails the whole pattern.
    pub fn capture(&self, text: &str) -> Option<Value> {
        match self {
            Self::Str | Self::Any => Some(Value::String(text.to_string())),
            Self::Int => text.parse::<i64>().ok().map(Value::from),
            Self::Float => text
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            Self::Bool => match text {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }
}

/// One compiled element of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Exact, case-sensitive text match.
    Literal(String),
    /// Named capture with a type constraint.
    Param {
        name: String,
        constraint: TypeConstraint,
        optional: bool,
    },
}

/// Immutable compiled form of a pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub(crate) fn new(raw: String, segments: Vec<Segment>) -> Self {
        Self { raw, segments }
    }

    /// The pattern string this was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
