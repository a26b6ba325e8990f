//! Per-request context handed to middleware and handlers.
//!
//! # Responsibilities
//! - Carry the parsed request (method, path, query, headers, body)
//! - Hold the attribute map middleware use to pass values downstream
//! - Hold the path parameters captured by the matched pattern
//!
//! # Design Decisions
//! - Exclusively owned by its request's task; never shared or aliased
//! - Attributes and captures are `serde_json::Value` so typed pattern
//!   captures (int 42, not "42") survive into binding
//! - Path parameters are written once, by the dispatcher, after matching

use std::collections::HashMap;

use axum::http::{HeaderMap, Method};
use serde_json::Value;

/// Mutable state for one in-flight request.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    body: Option<Value>,
    headers: HeaderMap,
    attributes: HashMap<String, Value>,
    path_params: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            body: None,
            headers: HeaderMap::new(),
            attributes: HashMap::new(),
            path_params: HashMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as UTF-8 text, `None` if absent or not valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Attach a value for later middleware and the parameter binder.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    pub(crate) fn set_path_params(&mut self, params: HashMap<String, Value>) {
        self.path_params = params;
    }

    pub fn path_param(&self, name: &str) -> Option<&Value> {
        self.path_params.get(name)
    }

    pub fn path_params(&self) -> &HashMap<String, Value> {
        &self.path_params
    }
}
