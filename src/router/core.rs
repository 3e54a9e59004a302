//! Router core module - registration and the per-request dispatch path.

use http::Method;
use regex::Regex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::group::RouteGroup;
use super::params::{get_param, ParamSet, ParamVec};
use super::pattern::{compile_pattern, PatternError};
use crate::middleware::Middleware;
use crate::server::{handler, Handler, Request, Response};
use crate::static_files::StaticFiles;

/// Name of the catch-all parameter used by [`Router::static_files`].
pub const STATIC_PATH_PARAM: &str = "filepath";

/// One registered `(method, pattern, handler, middleware)` tuple.
///
/// Routes are immutable once built; the router only ever appends them.
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    matcher: Regex,
    param_names: Vec<Arc<str>>,
    handler: Handler,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Route {
    /// Compile `pattern` and build a route from it.
    ///
    /// # Errors
    ///
    /// Returns the [`PatternError`] produced by the pattern compiler.
    pub fn new(
        method: Method,
        pattern: &str,
        handler: Handler,
        middlewares: Vec<Arc<dyn Middleware>>,
    ) -> Result<Self, PatternError> {
        let compiled = compile_pattern(pattern)?;
        Ok(Self {
            method,
            pattern: pattern.to_string(),
            matcher: compiled.matcher,
            param_names: compiled.param_names,
            handler,
            middlewares,
        })
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern as it was registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Number of route-specific middleware.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Match `path` against this route, returning the captured parameters.
    ///
    /// Matching runs on the raw (still percent-encoded) path, so an encoded
    /// `%2F` never splits a segment. Each captured value is then
    /// percent-decoded: `/users/john%20doe` binds `id = "john doe"` and
    /// `/users/a%2Fb` binds `id = "a/b"`. A capture that does not decode to
    /// UTF-8 means the route does not match.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<ParamSet> {
        let caps = self.matcher.captures(path)?;
        let params = self
            .param_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let raw = caps.get(i + 1).map_or("", |m| m.as_str());
                match urlencoding::decode(raw) {
                    Ok(value) => Some((Arc::clone(name), value.into_owned())),
                    Err(e) => {
                        debug!(param = %name, raw = %raw, error = %e, "Undecodable path parameter");
                        None
                    }
                }
            })
            .collect::<Option<ParamVec>>()?;
        Some(ParamSet::from_vec(params))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("matcher", &self.matcher.as_str())
            .field("param_names", &self.param_names)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}

/// Ordered route table plus router-wide middleware.
///
/// Build it completely before serving. Once requests are being dispatched the
/// router is only read; to change routes at runtime, build a new router and
/// swap it in through [`SharedRouter`](crate::hot_reload::SharedRouter).
///
/// # Matching
///
/// Routes are tried in registration order and the first one whose method and
/// anchored matcher both accept the request wins. Overlapping patterns are
/// not an error: a later route is simply shadowed.
///
/// # Middleware order
///
/// The chain is composed fresh for every dispatch, so [`Router::use_middleware`]
/// also applies to routes registered before it. Inbound order is router
/// middleware (registration order), then route middleware (registration
/// order), then the handler; post-processing unwinds in reverse.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append router-wide middleware.
    pub fn use_middleware(&mut self, middleware: Arc<dyn Middleware>) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Compile `pattern` and append a route for `method`.
    ///
    /// `middlewares` are route-specific and run after all router-wide
    /// middleware, in the order given, with the last one directly around the
    /// handler.
    ///
    /// # Errors
    ///
    /// A malformed pattern is a configuration error and nothing is registered.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        let route = Route::new(method, pattern, handler, middlewares.to_vec())?;
        debug!(
            method = %route.method,
            pattern = %route.pattern,
            matcher = %route.matcher.as_str(),
            param_names = ?route.param_names,
            middleware_count = route.middlewares.len(),
            "Route registered"
        );
        self.routes.push(route);
        Ok(self)
    }

    /// Register a `GET` route. See [`Router::add_route`].
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for a malformed pattern.
    pub fn get(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::GET, pattern, handler, middlewares)
    }

    /// Register a `POST` route. See [`Router::add_route`].
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for a malformed pattern.
    pub fn post(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::POST, pattern, handler, middlewares)
    }

    /// Register a `PUT` route. See [`Router::add_route`].
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for a malformed pattern.
    pub fn put(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::PUT, pattern, handler, middlewares)
    }

    /// Register a `DELETE` route. See [`Router::add_route`].
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for a malformed pattern.
    pub fn delete(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::DELETE, pattern, handler, middlewares)
    }

    /// Register a `PATCH` route. See [`Router::add_route`].
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for a malformed pattern.
    pub fn patch(
        &mut self,
        pattern: &str,
        handler: Handler,
        middlewares: &[Arc<dyn Middleware>],
    ) -> Result<&mut Self, PatternError> {
        self.add_route(Method::PATCH, pattern, handler, middlewares)
    }

    /// Start a group of routes sharing `prefix` and leading `middlewares`.
    pub fn group(&mut self, prefix: &str, middlewares: &[Arc<dyn Middleware>]) -> RouteGroup<'_> {
        RouteGroup::new(self, prefix, middlewares)
    }

    /// Serve files from `dir` for every `GET` under `prefix`.
    ///
    /// Registers an ordinary route `GET {prefix}/{*filepath}`; the remainder of
    /// the path is resolved inside `dir` by [`StaticFiles`].
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if `prefix` is not a valid pattern.
    pub fn static_files(
        &mut self,
        prefix: &str,
        dir: impl Into<PathBuf>,
    ) -> Result<&mut Self, PatternError> {
        let files = Arc::new(StaticFiles::new(dir));
        let pattern = format!("{}/{{*{STATIC_PATH_PARAM}}}", prefix.trim_end_matches('/'));
        self.get(
            &pattern,
            handler(move |res: &mut Response, req: &Request| {
                files.serve(res, get_param(req, STATIC_PATH_PARAM));
            }),
            &[],
        )
    }

    /// Registered routes in match order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of router-wide middleware.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!(
                "[route] {:<7} {} (params: {}, middleware: {})",
                route.method.as_str(),
                route.pattern,
                route.param_names.join(","),
                route.middlewares.len()
            );
        }
    }

    /// Find the first route accepting `method` and `path`.
    ///
    /// Pure lookup; no handler or middleware runs.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<(&Route, ParamSet)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.match_path(path).map(|params| (route, params)))
    }

    /// Dispatch `req` to the first matching route, writing into `res`.
    ///
    /// On a match, the captured [`ParamSet`] is attached to the request and
    /// the composed chain runs. Without a match the response becomes
    /// `404 Not Found` and nothing else runs.
    pub fn dispatch(&self, res: &mut Response, mut req: Request) {
        let match_start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        debug!(method = %method, path = %path, "Route match attempt");

        let Some((route, params)) = self.route(&method, &path) else {
            warn!(
                method = %method,
                path = %path,
                duration_us = match_start.elapsed().as_micros() as u64,
                "No route matched"
            );
            res.not_found();
            return;
        };

        info!(
            method = %method,
            path = %path,
            route_pattern = %route.pattern,
            path_params = ?params,
            duration_us = match_start.elapsed().as_micros() as u64,
            "Route matched"
        );

        req.extensions_mut().insert(params);
        let chain = self.compose(route);
        chain(res, &req);
    }

    /// Dispatch `req` into a fresh [`Response`].
    #[must_use]
    pub fn handle(&self, req: Request) -> Response {
        let mut res = Response::new();
        self.dispatch(&mut res, req);
        res
    }

    /// Wrap the route's handler: route middleware innermost, router
    /// middleware outermost, each list folded from its last entry.
    fn compose(&self, route: &Route) -> Handler {
        let inner = route
            .middlewares
            .iter()
            .rev()
            .fold(Arc::clone(&route.handler), |next, mw| mw.wrap(next));
        self.middlewares
            .iter()
            .rev()
            .fold(inner, |next, mw| mw.wrap(next))
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}
