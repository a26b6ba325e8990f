//! Core dispatch scenarios, end to end through the dispatcher (no network).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use lumynus::{
    handler_fn, middleware_fn, ControlSignal, Dispatcher, ParamSpec, RequestContext, ResponseBody,
    RouteTable,
};
use serde_json::json;

fn get(path: &str) -> RequestContext {
    RequestContext::new(Method::GET, path)
}

fn accept(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(value));
    headers
}

#[test]
fn scenario_a_greeter_binds_string_name() {
    let mut table = RouteTable::new();
    table
        .get(
            "hello/{name}[string]",
            handler_fn(vec![ParamSpec::required("name")], |_ctx, args, res| {
                let name = args[0].as_ref().and_then(|v| v.as_str()).unwrap();
                res.text(format!("hello {name}"));
                Ok(())
            }),
        )
        .unwrap();

    let res = Dispatcher::new(table).dispatch(get("/hello/Ana"));
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.body(), &ResponseBody::Text("hello Ana".into()));
}

#[test]
fn scenario_b_int_constraint_rejects_text_and_binds_number() {
    let mut table = RouteTable::new();
    table
        .get(
            "num/{n}[int]",
            handler_fn(vec![ParamSpec::required("n")], |_ctx, args, res| {
                res.json(json!({ "n": args[0].clone() }));
                Ok(())
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let res = dispatcher.dispatch(get("/num/abc"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = dispatcher.dispatch(get("/num/42"));
    assert_eq!(res.status(), StatusCode::OK);
    // The capture is the integer 42, not the string "42".
    assert_eq!(res.body(), &ResponseBody::Json(json!({"n": 42})));
}

#[test]
fn scenario_c_guard_halts_without_token() {
    let handler_ran = Arc::new(AtomicUsize::new(0));
    let marker = handler_ran.clone();

    let guard = middleware_fn(|ctx, res| {
        if ctx.header("token").is_none() {
            res.set_status(StatusCode::UNAUTHORIZED);
            res.text("no token");
            return Ok(ControlSignal::Halt);
        }
        Ok(ControlSignal::Continue)
    });

    let mut table = RouteTable::new();
    table
        .register(
            &[Method::GET],
            &["secure"],
            handler_fn(Vec::new(), move |_ctx, _args, res| {
                marker.fetch_add(1, Ordering::SeqCst);
                res.done();
                Ok(())
            }),
            vec![guard],
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let res = dispatcher.dispatch(get("/secure"));
    assert_eq!(handler_ran.load(Ordering::SeqCst), 0);
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.body(), &ResponseBody::Text("no token".into()));

    let mut headers = HeaderMap::new();
    headers.insert("token", HeaderValue::from_static("abc"));
    let res = dispatcher.dispatch(get("/secure").with_headers(headers));
    assert_eq!(handler_ran.load(Ordering::SeqCst), 1);
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn scenario_d_scoped_routes_inherit_middleware() {
    let chain_runs = Arc::new(AtomicUsize::new(0));
    let counter = chain_runs.clone();
    let counting = middleware_fn(move |_ctx, _res| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(ControlSignal::Continue)
    });

    let ok_handler = || {
        handler_fn(Vec::new(), |_ctx, _args, res| {
            res.done();
            Ok(())
        })
    };

    let mut table = RouteTable::new();
    table
        .scope(vec![counting], |table| {
            table.get("inside/a", ok_handler())?;
            table.get("inside/b", ok_handler())
        })
        .unwrap();
    table.get("outside", ok_handler()).unwrap();

    let dispatcher = Dispatcher::new(table);
    dispatcher.dispatch(get("/inside/a"));
    dispatcher.dispatch(get("/inside/b"));
    assert_eq!(chain_runs.load(Ordering::SeqCst), 2);

    dispatcher.dispatch(get("/outside"));
    assert_eq!(chain_runs.load(Ordering::SeqCst), 2);
}

#[test]
fn earlier_registration_wins_when_both_entries_match() {
    let ok = |tag: &'static str| {
        handler_fn(Vec::new(), move |_ctx, _args, res| {
            res.text(tag);
            Ok(())
        })
    };

    let mut table = RouteTable::new();
    table.get("pick/{a}", ok("first")).unwrap();
    table.get("pick/{b}", ok("second")).unwrap();

    let res = Dispatcher::new(table).dispatch(get("/pick/x"));
    assert_eq!(res.body(), &ResponseBody::Text("first".into()));
}

#[test]
fn attribute_set_by_middleware_reaches_later_middleware_and_binder() {
    let stamp = middleware_fn(|ctx, _res| {
        ctx.set_attribute("user", json!("ana"));
        Ok(ControlSignal::Continue)
    });
    let observe = middleware_fn(|ctx, _res| {
        assert_eq!(ctx.attribute("user"), Some(&json!("ana")));
        Ok(ControlSignal::Continue)
    });

    let mut table = RouteTable::new();
    table
        .register(
            &[Method::GET],
            &["whoami"],
            handler_fn(vec![ParamSpec::required("user")], |_ctx, args, res| {
                res.json(json!({ "user": args[0].clone() }));
                Ok(())
            }),
            vec![stamp, observe],
        )
        .unwrap();

    let res = Dispatcher::new(table).dispatch(get("/whoami"));
    assert_eq!(res.body(), &ResponseBody::Json(json!({"user": "ana"})));
}

#[test]
fn binding_precedence_is_path_then_attribute_then_default() {
    let stamp = middleware_fn(|ctx, _res| {
        ctx.set_attribute("id", json!("from-attribute"));
        ctx.set_attribute("mode", json!("from-attribute"));
        Ok(ControlSignal::Continue)
    });

    let mut table = RouteTable::new();
    table
        .register(
            &[Method::GET],
            &["things/{id}[int]"],
            handler_fn(
                vec![
                    ParamSpec::required("id"),
                    ParamSpec::required("mode"),
                    ParamSpec::with_default("limit", json!(10)),
                ],
                |_ctx, args, res| {
                    res.json(json!({
                        "id": args[0].clone(),
                        "mode": args[1].clone(),
                        "limit": args[2].clone(),
                    }));
                    Ok(())
                },
            ),
            vec![stamp],
        )
        .unwrap();

    let res = Dispatcher::new(table).dispatch(get("/things/5"));
    assert_eq!(
        res.body(),
        &ResponseBody::Json(json!({
            "id": 5,
            "mode": "from-attribute",
            "limit": 10,
        }))
    );
}

#[test]
fn negotiation_json_plain_and_html_bodies() {
    let dispatcher = Dispatcher::new(RouteTable::new());

    let res = dispatcher.dispatch(get("/missing").with_headers(accept("application/json")));
    match res.body() {
        ResponseBody::Json(value) => {
            assert!(value.get("error").is_some());
            assert_eq!(value.get("code"), Some(&json!(404)));
        }
        other => panic!("unexpected body {other:?}"),
    }

    let res = dispatcher.dispatch(get("/missing").with_headers(accept("text/plain")));
    match res.body() {
        ResponseBody::Text(text) => assert!(text.starts_with("Erro 404: ")),
        other => panic!("unexpected body {other:?}"),
    }

    let res = dispatcher.dispatch(get("/missing"));
    match res.body() {
        ResponseBody::Html(markup) => assert!(markup.contains("Lumynus")),
        other => panic!("unexpected body {other:?}"),
    }
}

#[test]
fn different_method_never_matches() {
    let mut table = RouteTable::new();
    table
        .post(
            "submit",
            handler_fn(Vec::new(), |_ctx, _args, res| {
                res.done();
                Ok(())
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    assert_eq!(
        dispatcher.dispatch(get("/submit")).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        dispatcher
            .dispatch(RequestContext::new(Method::POST, "/submit"))
            .status(),
        StatusCode::OK
    );
}

#[test]
fn completion_hook_runs_once_even_on_halt() {
    let completions = Arc::new(AtomicUsize::new(0));

    let halter = middleware_fn(|_ctx, res| {
        res.done();
        Ok(ControlSignal::Halt)
    });
    let mut table = RouteTable::new();
    table
        .register(
            &[Method::GET],
            &["halted"],
            handler_fn(Vec::new(), |_ctx, _args, res| {
                res.done();
                Ok(())
            }),
            vec![halter],
        )
        .unwrap();

    let counter = completions.clone();
    let dispatcher = Dispatcher::new(table).on_complete(move |_ctx| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    dispatcher.dispatch(get("/halted"));
    assert_eq!(completions.load(Ordering::SeqCst), 1);
}

#[test]
fn independent_tables_coexist() {
    let greet = |text: &'static str| {
        handler_fn(Vec::new(), move |_ctx, _args, res| {
            res.text(text);
            Ok(())
        })
    };

    let mut first = RouteTable::new();
    first.get("shared", greet("one")).unwrap();
    let mut second = RouteTable::new();
    second.get("shared", greet("two")).unwrap();

    let a = Dispatcher::new(first);
    let b = Dispatcher::new(second);
    assert_eq!(a.dispatch(get("/shared")).body(), &ResponseBody::Text("one".into()));
    assert_eq!(b.dispatch(get("/shared")).body(), &ResponseBody::Text("two".into()));
}
