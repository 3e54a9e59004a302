use enzovu::middleware::{from_fn, AuthMiddleware, LoggingMiddleware, Middleware};
use enzovu::server::{handler, Handler, Request, Response};
use enzovu::Router;
use http::{Method, StatusCode};
use std::sync::Arc;

mod common;
use common::http::{get, request};
use common::recorder::{recording, recording_handler, Events};

#[test]
fn test_router_then_route_middleware_order() {
    let events = Events::new();
    let mut router = Router::new();
    router
        .use_middleware(recording(&events, "A"))
        .use_middleware(recording(&events, "B"));
    router
        .get(
            "/chain",
            recording_handler(&events, "H"),
            &[recording(&events, "C"), recording(&events, "D")],
        )
        .unwrap();

    let res = get(&router, "/chain");
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        events.take(),
        vec![
            "pre:A", "pre:B", "pre:C", "pre:D", "handler:H", "post:D", "post:C", "post:B",
            "post:A",
        ]
    );
}

#[test]
fn test_short_circuit_skips_everything_inside() {
    let events = Events::new();
    let deny: Arc<dyn Middleware> = {
        let events = events.clone();
        from_fn(move |_next: Handler| {
            let events = events.clone();
            Arc::new(move |res: &mut Response, _req: &Request| {
                events.push("deny");
                res.error(StatusCode::FORBIDDEN, "Forbidden");
            }) as Handler
        })
    };

    let mut router = Router::new();
    router.use_middleware(recording(&events, "outer"));
    router
        .get(
            "/guarded",
            recording_handler(&events, "H"),
            &[deny, recording(&events, "inner")],
        )
        .unwrap();

    let res = get(&router, "/guarded");
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body_str(), "Forbidden\n");
    assert_eq!(events.take(), vec!["pre:outer", "deny", "post:outer"]);
}

#[test]
fn test_middleware_can_rewrite_the_response_afterwards() {
    let stamp = from_fn(|next: Handler| {
        Arc::new(move |res: &mut Response, req: &Request| {
            next(res, req);
            res.headers
                .insert("x-served-by", http::HeaderValue::from_static("enzovu"));
        }) as Handler
    });

    let mut router = Router::new();
    router
        .get(
            "/stamped",
            handler(|res: &mut Response, _: &Request| {
                res.text("ok");
            }),
            &[stamp],
        )
        .unwrap();

    let res = get(&router, "/stamped");
    assert_eq!(res.headers.get("x-served-by").unwrap(), "enzovu");
    assert_eq!(res.body_str(), "ok");
}

#[test]
fn test_route_middleware_is_scoped_to_its_route() {
    let events = Events::new();
    let mut router = Router::new();
    router
        .get(
            "/with",
            recording_handler(&events, "with"),
            &[recording(&events, "M")],
        )
        .unwrap()
        .get("/without", recording_handler(&events, "without"), &[])
        .unwrap();

    get(&router, "/without");
    assert_eq!(events.take(), vec!["handler:without"]);
    get(&router, "/with");
    assert_eq!(events.take(), vec!["pre:M", "handler:with", "post:M"]);
}

#[test]
fn test_same_middleware_twice_runs_twice() {
    let events = Events::new();
    let twice = recording(&events, "T");
    let mut router = Router::new();
    router
        .get(
            "/twice",
            recording_handler(&events, "H"),
            &[Arc::clone(&twice), twice],
        )
        .unwrap();

    get(&router, "/twice");
    assert_eq!(
        events.take(),
        vec!["pre:T", "pre:T", "handler:H", "post:T", "post:T"]
    );
}

#[test]
fn test_auth_middleware_requires_authorization_header() {
    let events = Events::new();
    let auth: Arc<dyn Middleware> = Arc::new(AuthMiddleware);
    let mut router = Router::new();
    router
        .get("/private", recording_handler(&events, "private"), &[auth])
        .unwrap();

    let res = get(&router, "/private");
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body_str(), "Unauthorized\n");
    assert!(events.take().is_empty());

    let req = http::Request::builder()
        .method(Method::GET)
        .uri("/private")
        .header("Authorization", "Bearer anything")
        .body(Vec::new())
        .unwrap();
    let res = router.handle(req);
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(events.take(), vec!["handler:private"]);
}

#[test]
fn test_logging_middleware_is_transparent() {
    let mut router = Router::new();
    router.use_middleware(Arc::new(LoggingMiddleware));
    router
        .post(
            "/echo",
            handler(|res: &mut Response, req: &Request| {
                res.set_status(StatusCode::CREATED).write(req.body());
            }),
            &[],
        )
        .unwrap();

    let mut req = request(Method::POST, "/echo");
    *req.body_mut() = b"payload".to_vec();
    let res = router.handle(req);
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body, b"payload");
}
