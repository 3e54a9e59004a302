//! # Enzovu
//!
//! **Enzovu** is a small, coroutine-powered web application scaffold built around a
//! regex-compiled request router with composable middleware.
//!
//! ## Overview
//!
//! Routes are registered as `(method, pattern, handler, middleware...)` tuples. Each
//! pattern such as `/users/{id}/posts/{post_id}` is compiled once, at registration, into
//! an anchored regular expression plus an ordered list of placeholder names. Dispatch
//! walks the routes in registration order and runs the first one whose method matches
//! exactly and whose expression matches the whole path.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, route registration, groups, dispatch, parameters
//! - **[`middleware`]** - The `wrap(handler) -> handler` capability plus stock middleware
//! - **[`server`]** - Request/response types and the `may_minihttp` HTTP adapter
//! - **[`static_files`]** - File serving behind `Router::static_files`
//! - **[`hot_reload`]** - Atomic router snapshots and a filesystem watcher
//! - **[`config`]** - Application settings from `APP_*` environment variables
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`app`]** - The demo application's route table and handlers
//! - **[`cli`]** - The `enzovu` command line
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as HttpServer<br/>(may_minihttp)
//!     participant Service as AppService
//!     participant Shared as SharedRouter
//!     participant Router as Router
//!     participant Chain as Middleware Chain
//!     participant Handler
//!
//!     Client->>Server: GET /api/users/7
//!     Server->>Service: call(req, res)
//!     Service->>Service: Parse into http::Request
//!     Service->>Shared: load() snapshot
//!     Shared-->>Service: Arc<Router>
//!     Service->>Router: dispatch(res, req)
//!     Router->>Router: First route with equal method<br/>and full-path match
//!     alt No route matches
//!         Router-->>Service: 404 page not found
//!     else Route matched
//!         Router->>Router: Attach ParamSet {id: "7"}
//!         Router->>Chain: Router middleware, then route middleware
//!         Chain->>Handler: handler(res, req)
//!         Handler-->>Chain: status + body written
//!         Chain-->>Router: post-processing in reverse order
//!     end
//!     Service-->>Server: Write status, headers, body
//!     Server-->>Client: HTTP Response
//! ```
//!
//! ## Middleware Order
//!
//! For router middleware `[A, B]` and route middleware `[C, D]`, pre-processing runs
//! `A, B, C, D`, then the handler, then post-processing `D, C, B, A`. A middleware that
//! does not call its inner handler short-circuits everything inside it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use enzovu::hot_reload::SharedRouter;
//! use enzovu::router::{get_param, Router};
//! use enzovu::server::{handler, AppService, HttpServer, Request, Response};
//!
//! let mut router = Router::new();
//! router
//!     .get(
//!         "/hello/{name}",
//!         handler(|res: &mut Response, req: &Request| {
//!             res.text(format!("Hello, {}!", get_param(req, "name")));
//!         }),
//!         &[],
//!     )
//!     .expect("valid pattern");
//!
//! let service = AppService::new(SharedRouter::new(router));
//! let handle = HttpServer(service).start("127.0.0.1:8000").expect("bind");
//! handle.join().ok();
//! ```
//!
//! ## Runtime Considerations
//!
//! Enzovu uses the `may` coroutine runtime, not tokio. Each connection is served on a
//! coroutine whose stack size comes from `APP_STACK_SIZE`; handlers should avoid large
//! stack allocations and use `may`'s blocking facilities.

pub mod app;
pub mod cli;
pub mod config;
pub mod hot_reload;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod server;
pub mod static_files;

pub use config::AppConfig;
pub use hot_reload::SharedRouter;
pub use middleware::Middleware;
pub use router::{get_param, get_params, has_param, ParamSet, PatternError, Route, RouteGroup, Router};
pub use server::{handler, Handler, Request, Response};
