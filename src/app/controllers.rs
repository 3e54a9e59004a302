//! Handlers for the demo application.

use http::header::{HeaderValue, ALLOW};
use http::StatusCode;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use super::models::User;
use crate::router::get_param;
use crate::server::{handler, Handler, Request, Response};

pub const FRAMEWORK_VERSION: &str = env!("CARGO_PKG_VERSION");

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Enzovu</title>
    <style>
        body { font-family: sans-serif; text-align: center; padding: 50px; }
        .links a { margin: 0 15px; }
    </style>
</head>
<body>
    <h1>Welcome to Enzovu!</h1>
    <p>The application is running.</p>
    <div class="links">
        <a href="/about">About</a>
        <a href="/api/health">Health Check</a>
        <a href="/test-model">Test Model</a>
    </div>
</body>
</html>
"#;

/// `GET /`: `index.html` from `static_dir`, or a built-in welcome page.
pub fn home(static_dir: impl Into<PathBuf>) -> Handler {
    let index = static_dir.into().join("index.html");
    handler(move |res: &mut Response, _req: &Request| match fs::read(&index) {
        Ok(bytes) => {
            res.set_content_type("text/html; charset=utf-8");
            res.body = bytes;
        }
        Err(e) => {
            debug!(path = %index.display(), error = %e, "index.html unavailable, using welcome page");
            res.html(WELCOME_PAGE);
        }
    })
}

pub fn about(res: &mut Response, _req: &Request) {
    res.json(&json!({
        "message": "Welcome to Enzovu",
        "framework": "enzovu",
        "version": FRAMEWORK_VERSION,
        "language": "Rust",
        "features": [
            "Regex-compiled routing",
            "Route groups",
            "Composable middleware",
            "Static file serving",
            "Hot reload",
        ],
    }));
}

pub fn health(res: &mut Response, _req: &Request) {
    res.json(&json!({
        "status": "ok",
        "framework": "enzovu",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": "running",
    }));
}

pub fn test_get(res: &mut Response, _req: &Request) {
    res.json(&json!({ "message": "Hello from Enzovu!", "method": "GET" }));
}

pub fn test_post(res: &mut Response, _req: &Request) {
    res.json(&json!({ "message": "POST request received!", "method": "POST" }));
}

/// Any other method on `/api/test`.
pub fn test_method_not_allowed(res: &mut Response, _req: &Request) {
    res.set_status(StatusCode::METHOD_NOT_ALLOWED)
        .json(&json!({ "error": "Method not allowed" }));
    res.headers
        .insert(ALLOW, HeaderValue::from_static("GET, POST"));
}

pub fn test_model(res: &mut Response, _req: &Request) {
    res.json(&User::sample());
}

pub fn list_users(res: &mut Response, _req: &Request) {
    res.json(&User::directory());
}

/// `GET /api/users/{id}`
pub fn show_user(res: &mut Response, req: &Request) {
    let id = get_param(req, "id");
    match id
        .parse::<u64>()
        .ok()
        .and_then(|id| User::directory().into_iter().find(|u| u.id == id))
    {
        Some(user) => {
            res.json(&user);
        }
        None => {
            res.set_status(StatusCode::NOT_FOUND)
                .json(&json!({ "error": "user not found", "id": id }));
        }
    }
}

/// `GET /admin/dashboard`, mounted behind [`AuthMiddleware`](crate::middleware::AuthMiddleware).
pub fn dashboard(res: &mut Response, _req: &Request) {
    res.json(&json!({
        "message": "Welcome to the dashboard",
        "users": User::directory().len(),
    }));
}
