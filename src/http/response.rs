//! Response construction with a guarded terminal action.
//!
//! # Responsibilities
//! - Accumulate status and headers for one response
//! - Record exactly one terminal body write (json/html/text/file/redirect/
//!   done/send)
//! - Refuse a second terminal write (programming error → panic)
//!
//! # Design Decisions
//! - Default state is 200 with an empty body, so a halting middleware that
//!   wrote nothing still produces a well-formed response
//! - JSON bodies are kept structured until the transport serializes them
//!   (pretty-printed), so tests can assert on values, not strings
//! - Non-terminal writes after termination are ignored and logged, not fatal

use std::path::PathBuf;

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde_json::Value;

/// Terminal body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Html(String),
    Text(String),
    File(PathBuf),
    Redirect(String),
    Raw { bytes: Vec<u8>, content_type: String },
}

/// Builder for one response. Owned by a single request.
#[derive(Debug)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
    terminated: bool,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
            terminated: false,
        }
    }

    /// Set the status code. Ignored once a terminal action has fired.
    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        if self.terminated {
            tracing::warn!(status = %status, "status write after terminal action ignored");
            return self;
        }
        self.status = status;
        self
    }

    /// Set a header. Ignored once a terminal action has fired. Invalid
    /// header names or values are dropped with a log line.
    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        if self.terminated {
            tracing::warn!(header = name, "header write after terminal action ignored");
            return self;
        }
        match (name.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            (Ok(n), Ok(v)) => {
                self.headers.insert(n, v);
            }
            _ => tracing::warn!(header = name, "invalid header dropped"),
        }
        self
    }

    /// Terminal: JSON body (serialized pretty-printed by the transport).
    pub fn json(&mut self, value: Value) {
        self.terminate(ResponseBody::Json(value));
    }

    /// Terminal: HTML body.
    pub fn html(&mut self, markup: impl Into<String>) {
        self.terminate(ResponseBody::Html(markup.into()));
    }

    /// Terminal: plain-text body.
    pub fn text(&mut self, text: impl Into<String>) {
        self.terminate(ResponseBody::Text(text.into()));
    }

    /// Terminal: serve a file from disk. The transport reads it when the
    /// response is converted; a read failure becomes a 500 there.
    pub fn file(&mut self, path: impl Into<PathBuf>) {
        self.terminate(ResponseBody::File(path.into()));
    }

    /// Terminal: redirect. Sets 302 unless a redirect status was already
    /// chosen, plus the `Location` header.
    pub fn redirect(&mut self, location: impl Into<String>) {
        let location = location.into();
        if self.terminated {
            panic!("terminal response action fired twice on one request");
        }
        if !self.status.is_redirection() {
            self.status = StatusCode::FOUND;
        }
        if let Ok(v) = HeaderValue::from_str(&location) {
            self.headers.insert(axum::http::header::LOCATION, v);
        }
        self.terminate(ResponseBody::Redirect(location));
    }

    /// Terminal: raw bytes with an explicit content type.
    pub fn send(&mut self, bytes: Vec<u8>, content_type: &str) {
        if !self.terminated && !content_type.is_empty() {
            if let Ok(v) = HeaderValue::from_str(content_type) {
                self.headers.insert(axum::http::header::CONTENT_TYPE, v);
            }
        }
        self.terminate(ResponseBody::Raw {
            bytes,
            content_type: content_type.to_string(),
        });
    }

    /// Terminal: finish with whatever status/headers are set and no body.
    pub fn done(&mut self) {
        self.terminate(ResponseBody::Empty);
    }

    fn terminate(&mut self, body: ResponseBody) {
        if self.terminated {
            panic!("terminal response action fired twice on one request");
        }
        self.body = body;
        self.terminated = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub(crate) fn into_parts(self) -> (StatusCode, HeaderMap, ResponseBody) {
        (self.status, self.headers, self.body)
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
