use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

/// Inbound request as seen by handlers and middleware.
///
/// Per-request state produced by the router (the [`ParamSet`]) travels in the
/// request's extensions.
///
/// [`ParamSet`]: crate::router::ParamSet
pub type Request = http::Request<Vec<u8>>;

/// Parse query string parameters from a request's URI.
///
/// Keys and values are URL-decoded; for repeated keys the last value wins.
#[must_use]
pub fn query_params(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Convert a `may_minihttp` request into a [`Request`].
///
/// The URI keeps the query string; the router only matches against the path.
/// Headers whose name or value cannot be represented are dropped.
pub fn parse_request(req: may_minihttp::Request) -> Request {
    let raw_method = req.method().to_string();
    let raw_path = req.path().to_string();

    let mut headers = HeaderMap::new();
    for h in req.headers().iter() {
        match (
            HeaderName::from_bytes(h.name.as_bytes()),
            HeaderValue::from_bytes(h.value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => debug!(header = %h.name, "Dropping unrepresentable header"),
        }
    }

    let mut body = Vec::new();
    if let Err(e) = req.body().read_to_end(&mut body) {
        warn!(error = %e, path = %raw_path, "Failed to read request body");
        body.clear();
    }

    debug!(
        method = %raw_method,
        path = %raw_path,
        header_count = headers.len(),
        body_size_bytes = body.len(),
        "HTTP request parsed"
    );

    assemble(&raw_method, &raw_path, headers, body)
}

/// Build a [`Request`] from its wire parts.
///
/// A method token or target `http` rejects yields a bare `/` request tagged
/// with [`Malformed`]; such requests are never routed.
pub(crate) fn assemble(raw_method: &str, raw_path: &str, headers: HeaderMap, body: Vec<u8>) -> Request {
    let Ok(method) = Method::from_bytes(raw_method.as_bytes()) else {
        warn!(method = %raw_method, path = %raw_path, "Invalid request method");
        return malformed(Malformed::Method);
    };

    let mut builder = http::Request::builder().method(method);
    if let Some(slot) = builder.headers_mut() {
        *slot = headers;
    }
    match builder.uri(raw_path).body(body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, path = %raw_path, "Invalid request target");
            malformed(Malformed::Target)
        }
    }
}

fn malformed(reason: Malformed) -> Request {
    let mut request = Request::new(Vec::new());
    *request.uri_mut() = http::Uri::from_static("/");
    request.extensions_mut().insert(reason);
    request
}

/// Marker attached to requests the service must answer with 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// The method is not a valid HTTP token.
    Method,
    /// The request target is not a valid URI.
    Target,
}
