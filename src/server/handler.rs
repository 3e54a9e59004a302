use std::sync::Arc;

use super::{Request, Response};

/// A request-handling callback.
///
/// Handlers write their output, including any error status, into the
/// [`Response`] sink and return nothing.
pub type Handler = Arc<dyn Fn(&mut Response, &Request) + Send + Sync>;

/// Box a closure or `fn` item as a [`Handler`].
///
/// ```rust
/// use enzovu::server::{handler, Request, Response};
///
/// fn hello(res: &mut Response, _req: &Request) {
///     res.text("hello");
/// }
///
/// let h = handler(hello);
/// let mut res = Response::new();
/// h(&mut res, &http::Request::new(Vec::new()));
/// assert_eq!(res.body_str(), "hello");
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Response, &Request) + Send + Sync + 'static,
{
    Arc::new(f)
}
