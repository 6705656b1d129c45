//! File server implementation

use crate::mime;
use crate::path;
use crate::store::{FileStore, close_with};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, StatusCode};
use veil_core::Result;
use veil_core::server::{Handler, HandlerResponse};

/// Static file handler over any [`FileStore`].
///
/// Bind it to a [`crate::FilteringFileSystem`] so directories only ever
/// resolve to their index document.
#[derive(Debug, Clone)]
pub struct FileServer<S> {
    store: S,
}

/// A file read from the store
#[derive(Debug)]
pub struct ServedFile {
    pub content: Bytes,
    pub mime_type: String,
    /// Store path of the handle that produced the content
    pub path: String,
}

impl<S: FileStore> FileServer<S> {
    /// Create a new file server
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Open, read and close the entry at a store path
    pub async fn serve(&self, store_path: &str) -> Result<ServedFile> {
        let mut handle = self.store.open(store_path).await?;
        let meta = match handle.stat().await {
            Ok(meta) => meta,
            Err(err) => return close_with(handle, Err(err)).await,
        };
        let content = handle.read_all().await;
        let content = close_with(handle, content).await?;

        Ok(ServedFile {
            content,
            mime_type: mime::content_type(&meta.path),
            path: meta.path,
        })
    }
}

#[async_trait]
impl<S: FileStore> Handler for FileServer<S> {
    async fn handle(&self, req: &Request<()>) -> HandlerResponse {
        let method = req.method();
        if method != Method::GET && method != Method::HEAD {
            return HandlerResponse::method_not_allowed("GET, HEAD");
        }

        let raw_path = req.uri().path();
        let Some(decoded) = path::percent_decode(raw_path) else {
            tracing::debug!("Undecodable request path: {}", raw_path);
            return HandlerResponse::not_found();
        };
        let store_path = path::from_request(&decoded);

        tracing::debug!("📁 Serving request: {} -> {}", raw_path, store_path);

        let served = match self.serve(&store_path).await {
            Ok(served) => served,
            Err(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    tracing::error!("❌ {} {} failed: {}", method, raw_path, err);
                } else {
                    tracing::debug!("{} {} -> {} ({})", method, raw_path, status.as_u16(), err);
                }
                return HandlerResponse::error(status);
            }
        };

        let served_index = served.path != store_path;
        if decoded.ends_with('/') && !served_index && store_path != path::ROOT {
            tracing::debug!("{} {} -> 404 (trailing slash on a file)", method, raw_path);
            return HandlerResponse::not_found();
        }

        // An index stood in for a directory; relative links need the trailing slash.
        // The Location is relative so a path like `//host` cannot become an absolute URL.
        if served_index && !decoded.ends_with('/') {
            let name = raw_path.rsplit('/').next().unwrap_or(raw_path);
            // `a:b/` would parse as a scheme.
            let location = if name.contains(':') {
                format!("./{}/", name)
            } else {
                format!("{}/", name)
            };
            return HandlerResponse::redirect(&location, StatusCode::MOVED_PERMANENTLY);
        }

        let len = served.content.len();
        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            served.content
        };
        HandlerResponse::with_body(StatusCode::OK, body)
            .header("Content-Type", served.mime_type)
            .header("Content-Length", len.to_string())
    }
}
