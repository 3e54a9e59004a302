use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};
use tracing::{error, warn};

/// Response sink handed to every handler and middleware.
///
/// Handlers signal errors only through the status code and body written here;
/// nothing is returned from a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// All headers stay visible to middleware and in-process callers. On the
    /// wire only `Content-Type` (mapped onto a known type) and the first value
    /// of `Location`, `Cache-Control`, `WWW-Authenticate`, `Allow`, `Vary` and
    /// `X-Content-Type-Options` are sent; anything else is dropped.
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn set_content_type(&mut self, content_type: &'static str) -> &mut Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        self
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Append raw bytes to the body.
    pub fn write(&mut self, bytes: &[u8]) -> &mut Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// Replace the body with plain text.
    pub fn text(&mut self, body: impl Into<String>) -> &mut Self {
        self.set_content_type("text/plain; charset=utf-8");
        self.body = body.into().into_bytes();
        self
    }

    /// Replace the body with an HTML document.
    pub fn html(&mut self, body: impl Into<String>) -> &mut Self {
        self.set_content_type("text/html; charset=utf-8");
        self.body = body.into().into_bytes();
        self
    }

    /// Replace the body with `value` serialized as JSON.
    ///
    /// A value that cannot be serialized turns the response into a 500.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> &mut Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.set_content_type("application/json");
                self.body = bytes;
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize JSON response body");
                self.error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        }
        self
    }

    /// Replace the body with a plain-text error message and set `status`.
    pub fn error(&mut self, status: StatusCode, message: &str) -> &mut Self {
        self.status = status;
        self.set_content_type("text/plain; charset=utf-8");
        self.headers.insert(
            "x-content-type-options",
            HeaderValue::from_static("nosniff"),
        );
        self.body = format!("{message}\n").into_bytes();
        self
    }

    /// The terminal response for requests no route accepts.
    pub fn not_found(&mut self) -> &mut Self {
        self.error(StatusCode::NOT_FOUND, "404 page not found")
    }

    #[must_use]
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("")
    }
}

/// Canonical reason phrase for `status`, as a static string for the wire.
pub(crate) fn status_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// Map a content type onto a static `Content-Type:` header line.
///
/// The HTTP writer only takes `'static` header lines, so arbitrary values are
/// folded onto the closest known type.
pub(crate) fn content_type_line(content_type: Option<&str>) -> &'static str {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    match essence.as_deref() {
        Some("text/plain") => "Content-Type: text/plain; charset=utf-8",
        Some("text/html") => "Content-Type: text/html; charset=utf-8",
        Some("text/css") => "Content-Type: text/css; charset=utf-8",
        Some("application/javascript") | Some("text/javascript") => {
            "Content-Type: application/javascript"
        }
        Some("application/json") => "Content-Type: application/json",
        Some("image/png") => "Content-Type: image/png",
        Some("image/jpeg") => "Content-Type: image/jpeg",
        Some("image/svg+xml") => "Content-Type: image/svg+xml",
        Some("image/x-icon") => "Content-Type: image/x-icon",
        Some("text/event-stream") => "Content-Type: text/event-stream",
        None => "Content-Type: text/plain; charset=utf-8",
        Some(_) => "Content-Type: application/octet-stream",
    }
}

/// Headers copied to the wire besides `Content-Type`, with their canonical
/// spelling.
fn forwarded_name(name: &HeaderName) -> Option<&'static str> {
    match name.as_str() {
        "location" => Some("Location"),
        "cache-control" => Some("Cache-Control"),
        "www-authenticate" => Some("WWW-Authenticate"),
        "allow" => Some("Allow"),
        "vary" => Some("Vary"),
        "x-content-type-options" => Some("X-Content-Type-Options"),
        _ => None,
    }
}

/// Upper bound on distinct header lines leaked for the writer.
const MAX_INTERNED_LINES: usize = 1024;

/// Return a `'static` copy of `line`, leaking each distinct line once.
///
/// Returns `None` once [`MAX_INTERNED_LINES`] distinct lines exist, so
/// per-request values (a fresh `Location` per created item) cannot grow
/// memory without bound.
fn intern_line(line: String) -> Option<&'static str> {
    static LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
    let mut lines = LINES.get_or_init(Default::default).lock().ok()?;
    if let Some(existing) = lines.get(line.as_str()) {
        return Some(*existing);
    }
    if lines.len() >= MAX_INTERNED_LINES {
        warn!(header = %line, "Header line cache full, dropping header");
        return None;
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    lines.insert(leaked);
    Some(leaked)
}

/// Wire header lines for `headers`, `Content-Type` first.
pub(crate) fn header_lines(headers: &HeaderMap) -> Vec<&'static str> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let mut lines = vec![content_type_line(content_type)];
    for name in headers.keys() {
        let Some(canonical) = forwarded_name(name) else {
            continue;
        };
        let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) else {
            continue;
        };
        if let Some(line) = intern_line(format!("{canonical}: {value}")) {
            lines.push(line);
        }
    }
    lines
}

/// Copy a finished [`Response`] onto the wire-level response.
pub(crate) fn write_response(out: &mut may_minihttp::Response, res: Response) {
    out.status_code(res.status.as_u16() as usize, status_reason(res.status));
    for line in header_lines(&res.headers) {
        out.header(line);
    }
    out.body_vec(res.body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(StatusCode::OK), "OK");
        assert_eq!(status_reason(StatusCode::NOT_FOUND), "Not Found");
    }

    #[test]
    fn test_not_found_body() {
        let mut res = Response::new();
        res.not_found();
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body_str(), "404 page not found\n");
        assert_eq!(res.content_type(), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_json_body() {
        let mut res = Response::new();
        res.json(&serde_json::json!({ "status": "ok" }));
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(res.body_str(), r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_content_type_line() {
        assert_eq!(
            content_type_line(Some("application/json")),
            "Content-Type: application/json"
        );
        assert_eq!(
            content_type_line(Some("text/html; charset=utf-8")),
            "Content-Type: text/html; charset=utf-8"
        );
        assert_eq!(
            content_type_line(Some("application/x-custom")),
            "Content-Type: application/octet-stream"
        );
    }

    #[test]
    fn test_header_lines_forward_allow_listed_headers() {
        let mut res = Response::new();
        res.error(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
        res.headers
            .insert(http::header::ALLOW, HeaderValue::from_static("GET, POST"));
        res.headers
            .insert(http::header::LOCATION, HeaderValue::from_static("/users/7"));
        res.headers
            .insert("x-internal-trace", HeaderValue::from_static("abc"));

        let lines = header_lines(&res.headers);
        assert_eq!(lines[0], "Content-Type: text/plain; charset=utf-8");
        assert!(lines.contains(&"Allow: GET, POST"));
        assert!(lines.contains(&"Location: /users/7"));
        assert!(lines.contains(&"X-Content-Type-Options: nosniff"));
        assert!(!lines.iter().any(|l| l.contains("abc")));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_interned_lines_are_shared() {
        let a = intern_line("Vary: Accept".to_string()).unwrap();
        let b = intern_line("Vary: Accept".to_string()).unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
