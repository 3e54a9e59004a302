//! Static file serving for [`Router::static_files`](crate::router::Router::static_files).
//!
//! Paths arrive already percent-decoded (the router decodes path
//! parameters) and are resolved strictly inside the base directory: `..`,
//! absolute and prefix components are rejected. A path that names a
//! directory (or is empty) serves that directory's `index.html`.

use http::StatusCode;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

use crate::server::Response;

#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn map_path(&self, rel_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(rel_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if pb.is_dir() {
            pb.push("index.html");
        }
        Some(pb)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase()
            .as_str()
        {
            "html" | "htm" => "text/html; charset=utf-8",
            "css" => "text/css; charset=utf-8",
            "js" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain; charset=utf-8",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "svg" => "image/svg+xml",
            "ico" => "image/x-icon",
            _ => "application/octet-stream",
        }
    }

    /// Read the file addressed by `rel_path` along with its content type.
    ///
    /// # Errors
    ///
    /// `NotFound` for traversal attempts and missing files, otherwise the
    /// underlying I/O error.
    pub fn load(&self, rel_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let path = self
            .map_path(rel_path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = fs::read(&path)?;
        Ok((bytes, Self::content_type(&path)))
    }

    /// Write the file addressed by `rel_path` into `res`, or a 404.
    pub fn serve(&self, res: &mut Response, rel_path: &str) {
        match self.load(rel_path) {
            Ok((bytes, content_type)) => {
                debug!(path = %rel_path, size_bytes = bytes.len(), "Serving static file");
                res.set_status(StatusCode::OK).set_content_type(content_type);
                res.body = bytes;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %rel_path, "Static file not found");
                res.not_found();
            }
            Err(e) => {
                warn!(path = %rel_path, error = %e, "Failed to read static file");
                res.error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        }
    }
}
