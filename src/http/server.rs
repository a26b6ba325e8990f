//! HTTP server setup and request conversion.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all dispatch handler
//! - Wire up middleware layers (tracing, timeout)
//! - Generate a request ID per request and log the dispatch outcome
//! - Convert an inbound request into a `RequestContext`
//! - Convert the dispatcher's `ResponseBuilder` into an Axum response
//! - Bind the server to a listener with graceful shutdown
//!
//! # Design Decisions
//! - The core router is transport-agnostic; everything hyper-specific
//!   lives here
//! - JSON bodies are parsed eagerly (bounded) so handlers see a value map
//! - The request timeout is a transport concern; the core defines none

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use percent_encoding::percent_decode_str;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::http::context::RequestContext;
use crate::http::response::{ResponseBody, ResponseBuilder};
use crate::lifecycle::shutdown_signal;

/// Largest request body the adapter will buffer for JSON parsing.
const BODY_LIMIT: usize = 1024 * 1024;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server wrapping one dispatcher.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Wrap a fully built dispatcher. The route table inside it is frozen;
    /// from here on it is only read.
    pub fn new(config: AppConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Catch-all handler: convert, dispatch, convert back.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4();

    let (parts, body) = request.into_parts();
    let method = parts.method.clone();
    let path = decode_path(parts.uri.path());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "dispatching request"
    );

    let query = parts
        .uri
        .query()
        .map(parse_query)
        .unwrap_or_default();

    let mut ctx = RequestContext::new(parts.method, path.clone())
        .with_headers(parts.headers)
        .with_query(query);

    if let Some(value) = parse_json_body(&ctx, body).await {
        ctx = ctx.with_body(value);
    }

    let res = state.dispatcher.dispatch(ctx);
    let status = res.status();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status.as_u16(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "request complete"
    );

    into_axum_response(res).await
}

/// Percent-decode the path, segment by segment, so literals and captures
/// see `Ana Silva`, not `Ana%20Silva`. A segment that is not valid UTF-8
/// once decoded is kept as received.
fn decode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode the query component into a flat string map.
fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Buffer and parse a JSON request body, if the content type asks for it.
async fn parse_json_body(ctx: &RequestContext, body: Body) -> Option<serde_json::Value> {
    let is_json = ctx
        .header(header::CONTENT_TYPE.as_str())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false);
    if !is_json {
        return None;
    }
    let bytes = axum::body::to_bytes(body, BODY_LIMIT).await.ok()?;
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(error = %err, "request body is not valid JSON; ignored");
            None
        }
    }
}

/// Convert the core's response into the transport's.
async fn into_axum_response(res: ResponseBuilder) -> Response {
    let (status, headers, body) = res.into_parts();

    let (bytes, content_type): (Vec<u8>, Option<&str>) = match body {
        ResponseBody::Empty | ResponseBody::Redirect(_) => (Vec::new(), None),
        ResponseBody::Json(value) => {
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "null".to_string());
            (text.into_bytes(), Some("application/json"))
        }
        ResponseBody::Html(markup) => (markup.into_bytes(), Some("text/html; charset=utf-8")),
        ResponseBody::Text(text) => (text.into_bytes(), Some("text/plain; charset=utf-8")),
        // `send` already placed its content type in the header map.
        ResponseBody::Raw { bytes, .. } => (bytes, None),
        ResponseBody::File(path) => match tokio::fs::read(&path).await {
            Ok(bytes) => (bytes, Some(guess_content_type(&path))),
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "file response failed");
                let mut response = Response::new(Body::from("Erro 500: file not readable"));
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                return response;
            }
        },
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;

    if let Some(ct) = content_type {
        if !response.headers().contains_key(header::CONTENT_TYPE) {
            if let Ok(value) = HeaderValue::from_str(ct) {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
        }
    }

    response
}

fn guess_content_type(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
