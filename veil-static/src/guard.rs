//! Hidden path guard
//!
//! Rejects any request whose path has a segment starting with `.` before the
//! request reaches a store. Rejections are plain 404s so the response does not
//! confirm that the hidden entry exists.

use async_trait::async_trait;
use http::Request;
use veil_core::Error;
use veil_core::server::{Handler, HandlerResponse};

/// Marker that makes a path segment hidden
pub const HIDDEN_MARKER: char = '.';

/// Whether any non-empty segment of `path` is hidden.
///
/// One leading `/` is ignored; empty segments never match.
pub fn is_hidden_path(path: &str) -> bool {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.split('/').any(|segment| segment.starts_with(HIDDEN_MARKER))
}

/// Handler wrapper that answers 404 for hidden paths
#[derive(Debug, Clone)]
pub struct HiddenPathGuard<H> {
    inner: H,
}

impl<H: Handler> HiddenPathGuard<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    /// Whether a raw request path may be forwarded.
    ///
    /// Checks the percent-decoded form so `%2e` cannot smuggle a dot past the
    /// guard; undecodable paths are refused.
    pub fn admit(&self, request_path: &str) -> bool {
        match crate::path::percent_decode(request_path) {
            Some(decoded) => !is_hidden_path(&decoded),
            None => false,
        }
    }
}

#[async_trait]
impl<H: Handler> Handler for HiddenPathGuard<H> {
    async fn handle(&self, req: &Request<()>) -> HandlerResponse {
        let path = req.uri().path();
        if !self.admit(path) {
            let err = Error::HiddenSegment(path.to_string());
            tracing::debug!("🙈 Refused: {}", err);
            return HandlerResponse::not_found();
        }
        self.inner.handle(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileServer, FilteringFileSystem, MemoryStore};
    use http::StatusCode;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recorder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Handler for Recorder {
        async fn handle(&self, _req: &Request<()>) -> HandlerResponse {
            self.calls.fetch_add(1, Ordering::SeqCst);
            HandlerResponse::status(StatusCode::OK)
        }
    }

    fn get(path: &str) -> Request<()> {
        Request::get(path).body(()).unwrap()
    }

    #[test]
    fn test_hidden_segments() {
        for path in ["/.env", ".env", "/.configs/secret.txt", "/a/.git/config", "/a/b/.hidden", "/..", "/../etc/passwd"] {
            assert!(is_hidden_path(path), "{} should be hidden", path);
        }
    }

    #[test]
    fn test_visible_segments() {
        for path in ["/", "", "/index.html", "/css/", "/css//styles.css", "//x", "/a.b/c", "/file."] {
            assert!(!is_hidden_path(path), "{} should be visible", path);
        }
    }

    #[test]
    fn test_admit_decodes_first() {
        let guard = HiddenPathGuard::new(Recorder::default());
        assert!(!guard.admit("/%2eenv"));
        assert!(!guard.admit("/%2E%2E/etc/passwd"));
        assert!(!guard.admit("/bad%zz"));
        assert!(guard.admit("/css/styles.css"));
    }

    #[tokio::test]
    async fn test_rejection_short_circuits() {
        let recorder = Arc::new(Recorder::default());
        let guard = HiddenPathGuard::new(recorder.clone());

        let response = guard.handle(&get("/.env")).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);

        let response = guard.handle(&get("/index.html")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hidden_paths_never_touch_the_store() {
        let store = Arc::new(MemoryStore::from_files([
            (".env", "SECRET=1"),
            (".configs/secret.txt", "shh"),
            (".configs/index.html", "<h1>still secret</h1>"),
        ]));
        store.forbid_opens(true);
        let guard = HiddenPathGuard::new(FileServer::new(FilteringFileSystem::new(store.clone())));

        for path in [
            "/.env",
            "/.configs/secret.txt",
            "/.configs/",
            "/%2econfigs/",
            "/.missing",
            "/css/.missing/deeper",
            "/../etc/passwd",
        ] {
            let response = guard.handle(&get(path)).await;
            assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", path);
        }
        assert_eq!(store.opens(), 0);
    }
}
