//! # Demo Application
//!
//! The route table served by the `enzovu` binary.
//!
//! | Method | Pattern | Notes |
//! |---|---|---|
//! | GET | `/static/{*filepath}` | files under `APP_STATIC_DIR` |
//! | GET | `/` | `index.html` or a welcome page |
//! | GET | `/about` | |
//! | GET | `/test-model` | sample user |
//! | GET | `/api/health` | JSON health report with timestamp |
//! | GET, POST | `/api/test` | |
//! | PUT, DELETE, PATCH | `/api/test` | 405 `{"error":"Method not allowed"}` |
//! | GET | `/api/users` | |
//! | GET | `/api/users/{id}` | |
//! | GET | `/admin/dashboard` | requires an `Authorization` header |
//!
//! Every route runs inside [`LoggingMiddleware`].

pub mod controllers;
pub mod models;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::{AuthMiddleware, LoggingMiddleware, Middleware};
use crate::router::{PatternError, Router};
use crate::server::handler;

/// Build the application router for `config`.
///
/// # Errors
///
/// Returns the first [`PatternError`] hit while registering routes.
pub fn build_router(config: &AppConfig) -> Result<Router, PatternError> {
    let mut router = Router::new();
    router.use_middleware(Arc::new(LoggingMiddleware));

    router.static_files("/static", &config.static_dir)?;
    router
        .get("/", controllers::home(&config.static_dir), &[])?
        .get("/about", handler(controllers::about), &[])?
        .get("/test-model", handler(controllers::test_model), &[])?;

    router
        .group("/api", &[])
        .get("/health", handler(controllers::health), &[])?
        .get("/test", handler(controllers::test_get), &[])?
        .post("/test", handler(controllers::test_post), &[])?
        .put("/test", handler(controllers::test_method_not_allowed), &[])?
        .delete("/test", handler(controllers::test_method_not_allowed), &[])?
        .patch("/test", handler(controllers::test_method_not_allowed), &[])?
        .get("/users", handler(controllers::list_users), &[])?
        .get("/users/{id}", handler(controllers::show_user), &[])?;

    let auth: Arc<dyn Middleware> = Arc::new(AuthMiddleware);
    router
        .group("/admin", &[auth])
        .get("/dashboard", handler(controllers::dashboard), &[])?;

    Ok(router)
}
