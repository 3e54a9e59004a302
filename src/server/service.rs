use http::{Method, StatusCode};
use may_minihttp::HttpService;
use std::io;
use tracing::debug;

use super::request::{parse_request, Malformed, Request};
use super::response::{write_response, Response};
use crate::hot_reload::SharedRouter;

/// Adapter between the `may_minihttp` listener and a [`SharedRouter`].
///
/// Each call converts the wire request, loads one router snapshot, dispatches,
/// and writes the finished [`Response`] back. Each connection runs in its own
/// coroutine; the service keeps no per-request state of its own.
#[derive(Clone, Debug)]
pub struct AppService {
    pub router: SharedRouter,
}

impl AppService {
    #[must_use]
    pub fn new(router: SharedRouter) -> Self {
        Self { router }
    }
}

/// Basic health check body, `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) {
    res.set_status(StatusCode::OK)
        .json(&serde_json::json!({ "status": "ok" }));
}

impl AppService {
    /// Produce the response for one parsed request.
    ///
    /// Requests tagged [`Malformed`] get 400. `GET /health` falls back to
    /// [`health_endpoint`] when no route claims it.
    #[must_use]
    pub fn respond(&self, request: Request) -> Response {
        let mut response = Response::new();

        if let Some(reason) = request.extensions().get::<Malformed>() {
            debug!(?reason, "Rejecting malformed request");
            response.error(StatusCode::BAD_REQUEST, "400 Bad Request");
            return response;
        }

        let router = self.router.load();
        let path = request.uri().path();
        if request.method() == Method::GET
            && path == "/health"
            && router.route(&Method::GET, path).is_none()
        {
            debug!("Serving built-in health endpoint");
            health_endpoint(&mut response);
        } else {
            router.dispatch(&mut response, request);
        }
        response
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: may_minihttp::Request, res: &mut may_minihttp::Response) -> io::Result<()> {
        let response = self.respond(parse_request(req));
        write_response(res, response);
        Ok(())
    }
}
