//! Demo Lumynus application.
//!
//! Registers a handful of routes exercising typed parameters, optional
//! segments, scoped middleware, and the negotiated error bodies, then
//! serves them.

use std::path::PathBuf;

use lumynus::{
    config, handler_fn, middleware_fn, observability, ControlSignal, Dispatcher, HttpServer,
    ParamSpec, RouteTable,
};
use serde_json::json;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var_os("LUMYNUS_CONFIG") {
        Some(path) => config::load_config(&PathBuf::from(path))?,
        None => config::AppConfig::default(),
    };

    observability::logging::init(&config.logging.filter);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        development = config.development,
        "configuration loaded"
    );

    let table = build_routes()?;
    tracing::info!(routes = table.len(), "route table frozen");

    let dispatcher = Dispatcher::new(table)
        .development(config.development)
        .on_complete(|ctx| {
            tracing::trace!(path = ctx.path(), "request resources released");
        });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, dispatcher);
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn build_routes() -> Result<RouteTable, lumynus::PatternError> {
    let mut table = RouteTable::new();

    table.get(
        "hello/{name}[string]",
        handler_fn(vec![ParamSpec::required("name")], |_ctx, args, res| {
            let name = args[0].as_ref().and_then(|v| v.as_str()).unwrap_or("world");
            res.json(json!({ "greeting": format!("Olá, {name}!") }));
            Ok(())
        }),
    )?;

    table.get(
        "num/{n}[int]",
        handler_fn(vec![ParamSpec::required("n")], |_ctx, args, res| {
            res.json(json!({ "n": args[0].clone() }));
            Ok(())
        }),
    )?;

    table.get(
        "posts/{id}[int]/[string slug]?",
        handler_fn(
            vec![ParamSpec::required("id"), ParamSpec::optional("slug")],
            |_ctx, args, res| {
                res.json(json!({ "id": args[0].clone(), "slug": args[1].clone() }));
                Ok(())
            },
        ),
    )?;

    // Routes below require a `token` header; the guard halts without one.
    let token_guard = middleware_fn(|ctx, res| {
        match ctx.header("token") {
            Some(token) => {
                ctx.set_attribute("token", json!(token));
                Ok(ControlSignal::Continue)
            }
            None => {
                res.set_status(axum::http::StatusCode::UNAUTHORIZED);
                res.json(json!({ "error": "missing token", "code": 401 }));
                Ok(ControlSignal::Halt)
            }
        }
    });
    table.scope(vec![token_guard], |table| {
        table.get(
            "admin/panel",
            handler_fn(vec![ParamSpec::required("token")], |_ctx, args, res| {
                res.json(json!({ "panel": "ok", "token": args[0].clone() }));
                Ok(())
            }),
        )
    })?;

    Ok(table)
}
