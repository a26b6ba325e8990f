//! Content-negotiated rendering of failure responses.
//!
//! # Responsibilities
//! - Pick a representation from a forced override, `Accept`, then
//!   `Content-Type`
//! - Render the exact body shape for each representation
//! - Terminate the request with the payload's status code
//!
//! # Design Decisions
//! - Precedence within one header value: json, xml, javascript, plain,
//!   then the HTML error card as the default
//! - Escaping is local and minimal (five XML/HTML entities); no template
//!   engine is involved in error paths

use axum::http::{header, HeaderMap, StatusCode};
use serde_json::{json, Value};

use crate::http::response::ResponseBuilder;

/// Representation of an error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Json,
    Xml,
    Javascript,
    Plain,
    Html,
}

impl ReportType {
    /// Match a header value against the known media types, in precedence
    /// order. Substring matching tolerates q-values and parameter lists.
    fn detect(value: &str) -> Option<Self> {
        if value.contains("application/json") {
            Some(Self::Json)
        } else if value.contains("application/xml") || value.contains("text/xml") {
            Some(Self::Xml)
        } else if value.contains("application/javascript") || value.contains("text/javascript") {
            Some(Self::Javascript)
        } else if value.contains("text/plain") {
            Some(Self::Plain)
        } else {
            None
        }
    }

    /// Negotiate from `Accept`, then `Content-Type`, defaulting to HTML.
    pub fn negotiate(headers: &HeaderMap) -> Self {
        headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .and_then(Self::detect)
            .or_else(|| {
                headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(Self::detect)
            })
            .unwrap_or(Self::Html)
    }
}

/// One message or an ordered list of messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    Single(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn joined(&self, separator: &str) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Many(list) => list.join(separator),
        }
    }

    fn as_json(&self) -> Value {
        match self {
            Self::Single(s) => Value::String(s.clone()),
            Self::Many(list) => json!(list),
        }
    }
}

/// Failure description consumed only by the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    pub message: ErrorMessage,
    pub code: u16,
    pub forced: Option<ReportType>,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: ErrorMessage::Single(message.into()),
            code,
            forced: None,
        }
    }

    pub fn with_messages(messages: Vec<String>, code: u16) -> Self {
        Self {
            message: ErrorMessage::Many(messages),
            code,
            forced: None,
        }
    }

    /// Force a representation, bypassing header negotiation.
    pub fn forced(mut self, report_type: ReportType) -> Self {
        self.forced = Some(report_type);
        self
    }
}

/// Renders failure responses. Stateless; shared freely.
#[derive(Debug, Default, Clone)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    /// Render `payload` into `res`, choosing the representation from the
    /// request headers. Always fires a terminal write.
    pub fn report(&self, payload: &ErrorPayload, request_headers: &HeaderMap, res: &mut ResponseBuilder) {
        let report_type = payload
            .forced
            .unwrap_or_else(|| ReportType::negotiate(request_headers));

        tracing::debug!(code = payload.code, report_type = ?report_type, "reporting error");

        let status =
            StatusCode::from_u16(payload.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        res.set_status(status);

        match report_type {
            ReportType::Json => {
                res.json(json!({
                    "error": payload.message.as_json(),
                    "code": payload.code,
                }));
            }
            ReportType::Xml => {
                let body = format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<error>\n  <code>{}</code>\n  <message>{}</message>\n</error>",
                    payload.code,
                    escape_markup(&payload.message.joined("; ")),
                );
                res.send(body.into_bytes(), "application/xml");
            }
            ReportType::Javascript => {
                let console_payload = match &payload.message {
                    ErrorMessage::Many(list) => json!(list),
                    ErrorMessage::Single(s) => json!({
                        "error": s,
                        "code": payload.code,
                    }),
                };
                let body = format!("console.error({});", console_payload);
                res.send(body.into_bytes(), "application/javascript");
            }
            ReportType::Plain => {
                res.text(format!(
                    "Erro {}: {}",
                    payload.code,
                    payload.message.joined("; ")
                ));
            }
            ReportType::Html => {
                res.html(render_html_card(payload));
            }
        }
    }
}

/// Fixed-style error card, the default representation.
fn render_html_card(payload: &ErrorPayload) -> String {
    let message = match &payload.message {
        ErrorMessage::Single(s) => escape_markup(s),
        ErrorMessage::Many(list) => list
            .iter()
            .map(|m| escape_markup(m))
            .collect::<Vec<_>>()
            .join("<br>"),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>Erro {code}</title>\n<style>\nbody{{margin:0;font-family:sans-serif;background:#f4f4f7;display:flex;align-items:center;justify-content:center;min-height:100vh}}\n.card{{background:#fff;border-radius:8px;box-shadow:0 2px 12px rgba(0,0,0,.08);padding:2.5rem 3rem;text-align:center;max-width:32rem}}\n.card h1{{margin:0 0 .75rem;color:#c0392b;font-size:2rem}}\n.card p{{margin:0;color:#444;line-height:1.5}}\n.card footer{{margin-top:1.5rem;color:#999;font-size:.8rem}}\n</style>\n</head>\n<body>\n<div class=\"card\">\n<h1>Erro {code}</h1>\n<p>{message}</p>\n<footer>Lumynus</footer>\n</div>\n</body>\n</html>",
        code = payload.code,
        message = message,
    )
}

/// Escape the five XML/HTML significant characters.
fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
