use std::sync::Arc;

use crate::server::Handler;

/// A handler-wrapping capability.
///
/// `wrap` receives the next handler in the chain and returns a handler that
/// runs around it. The returned handler may act before and/or after calling
/// `next`, or not call it at all to short-circuit the chain.
///
/// Any `Fn(Handler) -> Handler` closure is a middleware:
///
/// ```rust
/// use enzovu::middleware::{from_fn, Middleware};
/// use enzovu::server::{handler, Handler};
///
/// let noop = from_fn(|next: Handler| next);
/// let wrapped = noop.wrap(handler(|res, _req| { res.text("ok"); }));
/// # let _ = wrapped;
/// ```
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Middleware for F
where
    F: Fn(Handler) -> Handler + Send + Sync,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// Share a middleware value so it can be registered on routes, groups and
/// routers.
pub fn from_fn<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Arc::new(f)
}
