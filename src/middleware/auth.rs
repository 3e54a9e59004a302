use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::StatusCode;
use tracing::debug;

use super::Middleware;
use crate::server::{Handler, Request, Response};

/// Rejects requests that carry no `Authorization` header.
///
/// This is a presence check only; the header's value is passed through to the
/// handler untouched and is not verified here.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthMiddleware;

impl Middleware for AuthMiddleware {
    fn wrap(&self, next: Handler) -> Handler {
        Arc::new(move |res: &mut Response, req: &Request| {
            let present = req
                .headers()
                .get(AUTHORIZATION)
                .is_some_and(|v| !v.is_empty());
            if present {
                next(res, req);
            } else {
                debug!(path = %req.uri().path(), "Missing Authorization header");
                res.error(StatusCode::UNAUTHORIZED, "Unauthorized");
            }
        })
    }
}
