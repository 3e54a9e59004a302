use http::Method;
use std::sync::Arc;

use super::core::Router;
use super::pattern::PatternError;
use crate::middleware::Middleware;
use crate::server::Handler;

/// Registration helper that prefixes patterns and prepends middleware.
///
/// A group owns no routes. Each verb method forwards to
/// [`Router::add_route`] with `prefix + pattern` and the group middleware
/// followed by the call-site middleware, so
/// `router.group("/api", &[m1]).get("/x", h, &[m2])` registers exactly what
/// `router.add_route(Method::GET, "/api/x", h, &[m1, m2])` would.
pub struct RouteGroup<'r> {
    router: &'r mut Router,
    prefix: String,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl<'r> RouteGroup<'r> {
    pub(crate) fn new(
        router: &'r mut Router,
        prefix: &str,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Self {
        Self {
            router,
            prefix: prefix.to_string(),
            middlewares: middlewares.to_vec(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register `method` at `prefix + pattern`.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the joined pattern is malformed.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        let full_pattern = format!("{}{}", self.prefix, pattern);
        let merged: Vec<Arc<dyn Middleware>> = self
            .middlewares
            .iter()
            .chain(middlewares)
            .map(Arc::clone)
            .collect();
        self.router
            .add_route(method, &full_pattern, handler, &merged)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns a [`PatternError`] if the joined pattern is malformed.
    pub fn get(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::GET, pattern, handler, middlewares)
    }

    /// # Errors
    ///
    /// Returns a [`PatternError`] if the joined pattern is malformed.
    pub fn post(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::POST, pattern, handler, middlewares)
    }

    /// # Errors
    ///
    /// Returns a [`PatternError`] if the joined pattern is malformed.
    pub fn put(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::PUT, pattern, handler, middlewares)
    }

    /// # Errors
    ///
    /// Returns a [`PatternError`] if the joined pattern is malformed.
    pub fn delete(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::DELETE, pattern, handler, middlewares)
    }

    /// # Errors
    ///
    /// Returns a [`PatternError`] if the joined pattern is malformed.
    pub fn patch(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::PATCH, pattern, handler, middlewares)
    }
}
