//! Route registration and scoped middleware grouping.
//!
//! # Responsibilities
//! - Append route entries at boot, preserving registration order
//! - Compile patterns through the per-table cache
//! - Maintain the scope stack so grouped registrations inherit middleware
//!
//! # Design Decisions
//! - `register` is the single primitive; the verb methods are sugar
//! - Scope middleware is flattened into each entry's chain at
//!   registration, so matching needs no scope bookkeeping
//! - An entry may carry several alternative patterns, tried in order

use std::sync::Arc;

use axum::http::Method;

use crate::dispatch::Handler;
use crate::middleware::Middleware;
use crate::pattern::{PatternCache, PatternError, RoutePattern};

/// One registered route.
pub struct RouteEntry {
    pub(crate) methods: Vec<Method>,
    pub(crate) patterns: Vec<Arc<RoutePattern>>,
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) middleware: Vec<Arc<dyn Middleware>>,
    pub(crate) index: usize,
}

impl RouteEntry {
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn patterns(&self) -> &[Arc<RoutePattern>] {
        &self.patterns
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn middleware(&self) -> &[Arc<dyn Middleware>] {
        &self.middleware
    }

    /// Registration order, used as the match tie-break.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Append-only registry of routes, built at boot.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    scope_stack: Vec<Vec<Arc<dyn Middleware>>>,
    cache: PatternCache,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one route. `patterns` are syntactic variants of one
    /// logical path, tried in the order given. Middleware from enclosing
    /// scopes is prepended (outer scopes first) before `middleware`.
    pub fn register(
        &mut self,
        methods: &[Method],
        patterns: &[&str],
        handler: Arc<dyn Handler>,
        middleware: Vec<Arc<dyn Middleware>>,
    ) -> Result<(), PatternError> {
        let compiled = patterns
            .iter()
            .map(|p| self.cache.get(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut chain: Vec<Arc<dyn Middleware>> =
            self.scope_stack.iter().flatten().cloned().collect();
        chain.extend(middleware);

        let index = self.entries.len();
        tracing::debug!(index, patterns = ?patterns, "route registered");
        self.entries.push(RouteEntry {
            methods: methods.to_vec(),
            patterns: compiled,
            handler,
            middleware: chain,
            index,
        });
        Ok(())
    }

    pub fn get(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
        self.register(&[Method::GET], &[pattern], handler, Vec::new())
    }

    pub fn post(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
        self.register(&[Method::POST], &[pattern], handler, Vec::new())
    }

    pub fn put(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
        self.register(&[Method::PUT], &[pattern], handler, Vec::new())
    }

    pub fn delete(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
        self.register(&[Method::DELETE], &[pattern], handler, Vec::new())
    }

    pub fn patch(&mut self, pattern: &str, handler: Arc<dyn Handler>) -> Result<(), PatternError> {
        self.register(&[Method::PATCH], &[pattern], handler, Vec::new())
    }

    /// Run `body` with `middleware` pushed onto the scope stack. Every
    /// registration inside the body inherits the scope's chain; nested
    /// scopes compose with inner middleware after outer. The stack is
    /// popped when the body returns, error or not.
    pub fn scope<F>(
        &mut self,
        middleware: Vec<Arc<dyn Middleware>>,
        body: F,
    ) -> Result<(), PatternError>
    where
        F: FnOnce(&mut Self) -> Result<(), PatternError>,
    {
        self.scope_stack.push(middleware);
        let result = body(self);
        self.scope_stack.pop();
        result
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
