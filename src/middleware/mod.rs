//! # Middleware Module
//!
//! Middleware wraps a [`Handler`](crate::server::Handler) in another handler.
//! Chains are composed per dispatch by the router: router-wide middleware on
//! the outside, in registration order, then the matched route's middleware,
//! then the handler.
//!
//! ## Stock middleware
//!
//! - [`LoggingMiddleware`] - request span plus method/path/status/latency log
//! - [`AuthMiddleware`] - `401` when no `Authorization` header is present

mod auth;
mod core;
mod logging;

pub use auth::AuthMiddleware;
pub use core::{from_fn, Middleware};
pub use logging::LoggingMiddleware;
