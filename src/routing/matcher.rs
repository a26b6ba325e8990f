//! Route matching logic.
//!
//! # Responsibilities
//! - Scan entries in registration order, skipping mismatched methods
//! - Walk each candidate pattern segment-by-segment against the path
//! - Capture and type-validate parameter segments
//!
//! # Design Decisions
//! - Literal matching is exact and case-sensitive
//! - A failed type constraint fails the whole pattern, not just the
//!   segment; matching falls through to the next pattern or entry
//! - First entry+pattern combination wins; earlier registration wins ties
//! - Explicit no-match (`None`) rather than a silent default

use std::collections::HashMap;

use axum::http::Method;
use serde_json::Value;

use crate::pattern::{RoutePattern, Segment};

use super::table::RouteEntry;

/// A successful match: the winning entry plus its typed captures.
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: HashMap<String, Value>,
}

/// Find the first entry whose method set and one of whose patterns accept
/// the request.
pub fn match_request<'a>(
    entries: &'a [RouteEntry],
    method: &Method,
    path: &str,
) -> Option<RouteMatch<'a>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    for entry in entries {
        if !entry.methods().contains(method) {
            continue;
        }
        for pattern in entry.patterns() {
            if let Some(params) = match_pattern(pattern, &segments) {
                tracing::trace!(index = entry.index(), pattern = pattern.raw(), "route matched");
                return Some(RouteMatch { entry, params });
            }
        }
    }
    None
}

/// Walk compiled segments against path segments position by position.
fn match_pattern(pattern: &RoutePattern, segments: &[&str]) -> Option<HashMap<String, Value>> {
    let mut params = HashMap::new();
    let mut position = 0;

    for segment in pattern.segments() {
        match segment {
            Segment::Literal(text) => {
                if segments.get(position).copied() != Some(text.as_str()) {
                    return None;
                }
                position += 1;
            }
            Segment::Param {
                name,
                constraint,
                optional,
            } => match segments.get(position) {
                Some(text) => {
                    let value = constraint.capture(text)?;
                    params.insert(name.clone(), value);
                    position += 1;
                }
                // Absent optional: no binding, not an error.
                None if *optional => {}
                None => return None,
            },
        }
    }

    // Leftover path segments mean the pattern is too short.
    if position != segments.len() {
        return None;
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler_fn;
    use crate::routing::table::RouteTable;
    use serde_json::json;

    fn table_with(patterns: &[(&[Method], &str)]) -> RouteTable {
        let mut table = RouteTable::new();
        for (methods, pattern) in patterns.iter().copied() {
            table
                .register(
                    methods,
                    &[pattern],
                    handler_fn(Vec::new(), |_ctx, _args, res| {
                        res.done();
                        Ok(())
                    }),
                    Vec::new(),
                )
                .unwrap();
        }
        table
    }

    #[test]
    fn literal_match_is_case_sensitive() {
        let table = table_with(&[(&[Method::GET], "hello/world")]);
        assert!(match_request(table.entries(), &Method::GET, "/hello/world").is_some());
        assert!(match_request(table.entries(), &Method::GET, "/hello/World").is_none());
    }

    #[test]
    fn method_mismatch_skips_entry() {
        let table = table_with(&[(&[Method::GET], "hello")]);
        assert!(match_request(table.entries(), &Method::POST, "/hello").is_none());
    }

    #[test]
    fn captures_are_typed() {
        let table = table_with(&[(&[Method::GET], "num/{n}[int]")]);
        let m = match_request(table.entries(), &Method::GET, "/num/42").unwrap();
        assert_eq!(m.params.get("n"), Some(&json!(42)));
    }

    #[test]
    fn failed_constraint_fails_whole_pattern() {
        let table = table_with(&[(&[Method::GET], "num/{n}[int]")]);
        assert!(match_request(table.entries(), &Method::GET, "/num/abc").is_none());
    }

    #[test]
    fn constraint_failure_falls_through_to_next_entry() {
        let table = table_with(&[
            (&[Method::GET], "item/{id}[int]"),
            (&[Method::GET], "item/{slug}[string]"),
        ]);
        let m = match_request(table.entries(), &Method::GET, "/item/abc").unwrap();
        assert_eq!(m.entry.index(), 1);
        assert_eq!(m.params.get("slug"), Some(&json!("abc")));
    }

    #[test]
    fn alternative_patterns_on_one_entry_are_tried_in_order() {
        let mut table = RouteTable::new();
        table
            .register(
                &[Method::GET],
                &["v/{n}[int]", "v/{name}[string]"],
                handler_fn(Vec::new(), |_ctx, _args, res| {
                    res.done();
                    Ok(())
                }),
                Vec::new(),
            )
            .unwrap();
        let m = match_request(table.entries(), &Method::GET, "/v/abc").unwrap();
        assert_eq!(m.entry.index(), 0);
        assert_eq!(m.params.get("name"), Some(&json!("abc")));
    }

    #[test]
    fn earlier_registration_wins_ties() {
        let table = table_with(&[
            (&[Method::GET], "p/{a}"),
            (&[Method::GET], "p/{b}"),
        ]);
        let m = match_request(table.entries(), &Method::GET, "/p/x").unwrap();
        assert_eq!(m.entry.index(), 0);
    }

    #[test]
    fn absent_trailing_optional_matches_without_binding() {
        let table = table_with(&[(&[Method::GET], "posts/{id}[int]/[string slug]?")]);
        let m = match_request(table.entries(), &Method::GET, "/posts/7").unwrap();
        assert_eq!(m.params.get("id"), Some(&json!(7)));
        assert!(!m.params.contains_key("slug"));

        let m = match_request(table.entries(), &Method::GET, "/posts/7/draft").unwrap();
        assert_eq!(m.params.get("slug"), Some(&json!("draft")));
    }

    #[test]
    fn extra_path_segments_do_not_match() {
        let table = table_with(&[(&[Method::GET], "a/{b}")]);
        assert!(match_request(table.entries(), &Method::GET, "/a/x/y").is_none());
    }

    #[test]
    fn trailing_slashes_and_empty_segments_are_ignored() {
        let table = table_with(&[(&[Method::GET], "a/b")]);
        assert!(match_request(table.entries(), &Method::GET, "/a/b/").is_some());
        assert!(match_request(table.entries(), &Method::GET, "a//b").is_some());
    }
}
