//! # Hot Reload Module
//!
//! Runtime route reloads without a restart and without locking the dispatch
//! path.
//!
//! ## Overview
//!
//! A [`Router`] is never mutated once it serves traffic. Reloading means
//! building a complete new router off to the side and swapping a single
//! pointer:
//!
//! - [`SharedRouter`] holds the current router in an [`ArcSwap`]. Every
//!   dispatch loads one snapshot and uses it for the whole request, so a
//!   request sees either the old table or the new one, never a mix.
//! - In-flight requests keep their snapshot alive until they finish.
//! - [`watch_routes`] ties a filesystem watcher to a rebuild closure and
//!   swaps the result in when it succeeds.
//!
//! ## Error Handling
//!
//! If the rebuild fails (for example a malformed pattern):
//! - The error is logged
//! - The previous router remains active
//! - The server continues serving requests

use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::router::Router;
use crate::server::{Request, Response};

/// Atomically replaceable handle to the live [`Router`].
///
/// Cloning the handle is cheap and every clone observes the same swaps.
#[derive(Clone)]
pub struct SharedRouter {
    inner: Arc<ArcSwap<Router>>,
}

impl SharedRouter {
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(router)),
        }
    }

    /// The router snapshot currently being served.
    #[must_use]
    pub fn load(&self) -> Arc<Router> {
        self.inner.load_full()
    }

    /// Swap in a fully built router.
    pub fn replace(&self, router: Router) {
        let route_count = router.len();
        self.inner.store(Arc::new(router));
        info!(routes_count = route_count, "Router snapshot replaced");
    }

    /// Dispatch against a single snapshot.
    pub fn dispatch(&self, res: &mut Response, req: Request) {
        let router = self.inner.load_full();
        router.dispatch(res, req);
    }

    /// Dispatch into a fresh response against a single snapshot.
    #[must_use]
    pub fn handle(&self, req: Request) -> Response {
        let mut res = Response::new();
        self.dispatch(&mut res, req);
        res
    }
}

impl std::fmt::Debug for SharedRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRouter")
            .field("routes", &self.inner.load().len())
            .finish()
    }
}

/// Watch `path` and rebuild the router whenever it changes.
///
/// `rebuild` runs on the watcher thread for every modify or create event. A
/// successful result replaces the router in `shared`; an error is logged and
/// the current router keeps serving. Directories are watched recursively.
///
/// Keep the returned watcher alive for as long as reloads should happen.
///
/// # Errors
///
/// Returns an error if the watcher cannot be created or `path` cannot be
/// watched.
pub fn watch_routes<P, F>(
    path: P,
    shared: SharedRouter,
    rebuild: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: Fn() -> anyhow::Result<Router> + Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    let mode = if path.is_dir() {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    info!(paths = ?event.paths, "hot-reload: change detected, rebuilding routes");
                    match rebuild() {
                        Ok(router) => shared.replace(router),
                        Err(e) => warn!(
                            error = %format!("{e:#}"),
                            "hot-reload: rebuild failed, keeping current routes"
                        ),
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, mode)?;
    info!(path = %path.display(), "hot-reload: watching for changes");
    Ok(watcher)
}
