//! # Router Module
//!
//! The router compiles path patterns into anchored regex matchers, extracts
//! path parameters, and composes middleware chains around handlers.
//!
//! ## Overview
//!
//! - [`compile_pattern`] turns `/users/{id}` into `^/users/([^/]+)$` plus the
//!   ordered placeholder names `["id"]`.
//! - [`Router`] keeps routes in registration order, holds router-wide
//!   middleware, and dispatches requests.
//! - [`RouteGroup`] prefixes patterns and prepends middleware at
//!   registration time.
//! - [`get_params`] / [`get_param`] / [`has_param`] read the [`ParamSet`]
//!   attached to a dispatched request.
//!
//! ## Example
//!
//! ```rust
//! use enzovu::router::{get_param, Router};
//! use enzovu::server::{handler, Request, Response};
//!
//! # fn main() -> Result<(), enzovu::router::PatternError> {
//! let mut router = Router::new();
//! router.get(
//!     "/users/{id}",
//!     handler(|res: &mut Response, req: &Request| {
//!         res.text(format!("user {}", get_param(req, "id")));
//!     }),
//!     &[],
//! )?;
//!
//! let req = http::Request::get("/users/42").body(Vec::new()).unwrap();
//! let res = router.handle(req);
//! assert_eq!(res.body_str(), "user 42");
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! A [`Router`] is built before serving and then only read, so it can be
//! shared across request coroutines without locks. Runtime reloads replace
//! the whole router; see [`crate::hot_reload`].

mod core;
mod group;
mod params;
mod pattern;

pub use core::{Route, Router, STATIC_PATH_PARAM};
pub use group::RouteGroup;
pub use params::{get_param, get_params, has_param, ParamSet, ParamVec, MAX_INLINE_PARAMS};
pub use pattern::{compile_pattern, CompiledPattern, PatternError};
