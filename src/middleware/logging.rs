use std::sync::Arc;
use std::time::Instant;

use tracing::{info, info_span, warn};

use super::Middleware;
use crate::ids::RequestId;
use crate::server::{Handler, Request, Response};

/// Logs method, path, status and latency of every request it wraps.
///
/// Each request runs inside a `request` span carrying a fresh [`RequestId`]
/// (or the caller's `x-request-id` when it is a valid ULID). Server errors are
/// logged at `WARN`, everything else at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn wrap(&self, next: Handler) -> Handler {
        Arc::new(move |res: &mut Response, req: &Request| {
            let request_id = RequestId::from_header_or_new(
                req.headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok()),
            );
            let span = info_span!(
                "request",
                request_id = %request_id,
                method = %req.method(),
                path = %req.uri().path()
            );
            let _entered = span.enter();

            let start = Instant::now();
            next(res, req);
            let latency = start.elapsed();

            if res.status.is_server_error() {
                warn!(
                    status = res.status.as_u16(),
                    latency_us = latency.as_micros() as u64,
                    user_agent = ?req.headers().get("user-agent"),
                    "Request failed"
                );
            } else {
                info!(
                    status = res.status.as_u16(),
                    latency_us = latency.as_micros() as u64,
                    "Request completed"
                );
            }
        })
    }
}
