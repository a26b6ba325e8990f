//! Pattern string → RoutePattern compilation.
//!
//! # Responsibilities
//! - Split the pattern on '/' and classify each token
//! - Parse parameter declarations (braced and bracket-only forms)
//! - Reject malformed patterns with a specific error
//! - Cache compiled patterns per pattern string
//!
//! # Design Decisions
//! - Compilation never touches the route registry (pure function)
//! - Errors carry the offending pattern for boot-time diagnostics
//! - The cache hands out `Arc`s so entries can share compiled patterns

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{PatternError, RoutePattern, Segment, TypeConstraint};

/// Compile a pattern string into its immutable segment list.
pub fn compile(pattern: &str) -> Result<RoutePattern, PatternError> {
    let mut segments = Vec::new();
    let mut seen = HashSet::new();
    let mut optional_seen = false;

    for token in pattern.split('/').filter(|t| !t.is_empty()) {
        let segment = parse_token(pattern, token)?;
        match &segment {
            Segment::Literal(_) => {
                if optional_seen {
                    return Err(PatternError::RequiredAfterOptional {
                        pattern: pattern.to_string(),
                    });
                }
            }
            Segment::Param { name, optional, .. } => {
                if !seen.insert(name.clone()) {
                    return Err(PatternError::DuplicateParam {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
                if *optional {
                    optional_seen = true;
                } else if optional_seen {
                    return Err(PatternError::RequiredAfterOptional {
                        pattern: pattern.to_string(),
                    });
                }
            }
        }
        segments.push(segment);
    }

    Ok(RoutePattern::new(pattern.to_string(), segments))
}

/// Classify one '/'-delimited token.
fn parse_token(pattern: &str, token: &str) -> Result<Segment, PatternError> {
    if token.starts_with('{') {
        parse_braced(pattern, token)
    } else if token.starts_with('[') {
        parse_bracketed(pattern, token)
    } else if token.contains(['{', '}', '[', ']']) {
        // Brackets are only legal at the start of a parameter token.
        Err(PatternError::UnmatchedBracket {
            pattern: pattern.to_string(),
            token: token.to_string(),
        })
    } else {
        Ok(Segment::Literal(token.to_string()))
    }
}

/// `{name}`, `{name}[type]`, with an optional trailing `?`.
fn parse_braced(pattern: &str, token: &str) -> Result<Segment, PatternError> {
    let close = token.find('}').ok_or_else(|| PatternError::UnmatchedBracket {
        pattern: pattern.to_string(),
        token: token.to_string(),
    })?;
    let name = &token[1..close];
    let mut rest = &token[close + 1..];

    let optional = if let Some(stripped) = rest.strip_suffix('?') {
        rest = stripped;
        true
    } else {
        false
    };

    let constraint = if rest.is_empty() {
        TypeConstraint::Any
    } else {
        let tag = rest
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| PatternError::UnmatchedBracket {
                pattern: pattern.to_string(),
                token: token.to_string(),
            })?;
        TypeConstraint::from_tag(tag).ok_or_else(|| PatternError::UnknownType {
            pattern: pattern.to_string(),
            tag: tag.to_string(),
        })?
    };

    check_name(pattern, name)?;
    Ok(Segment::Param {
        name: name.to_string(),
        constraint,
        optional,
    })
}

/// `[type name]`, with an optional trailing `?`. The bracket-only form
/// declares an independent parameter segment, used for trailing captures
/// chained after a primary parameter.
fn parse_bracketed(pattern: &str, token: &str) -> Result<Segment, PatternError> {
    let mut rest = token;
    let optional = if let Some(stripped) = rest.strip_suffix('?') {
        rest = stripped;
        true
    } else {
        false
    };

    let inner = rest
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .ok_or_else(|| PatternError::UnmatchedBracket {
            pattern: pattern.to_string(),
            token: token.to_string(),
        })?;

    let mut parts = inner.split_whitespace();
    let (tag, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(tag), Some(name), None) => (tag, name),
        _ => {
            return Err(PatternError::UnmatchedBracket {
                pattern: pattern.to_string(),
                token: token.to_string(),
            })
        }
    };

    let constraint = TypeConstraint::from_tag(tag).ok_or_else(|| PatternError::UnknownType {
        pattern: pattern.to_string(),
        tag: tag.to_string(),
    })?;
    check_name(pattern, name)?;

    Ok(Segment::Param {
        name: name.to_string(),
        constraint,
        optional,
    })
}

fn check_name(pattern: &str, name: &str) -> Result<(), PatternError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(PatternError::InvalidName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        })
    }
}

/// Per-string cache of compiled patterns. Owned by the RouteTable so
/// independent tables never share state through a process-wide registry.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Arc<RoutePattern>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern`, reusing the cached result for a repeated string.
    pub fn get(&mut self, pattern: &str) -> Result<Arc<RoutePattern>, PatternError> {
        if let Some(existing) = self.compiled.get(pattern) {
            return Ok(existing.clone());
        }
        let compiled = Arc::new(compile(pattern)?);
        self.compiled.insert(pattern.to_string(), compiled.clone());
        Ok(compiled)
    }
}
