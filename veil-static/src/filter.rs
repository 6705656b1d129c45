//! Index-or-deny filtering store
//!
//! [`FilteringFileSystem`] wraps another [`FileStore`] and refuses to hand out
//! directories. Opening a directory that contains [`INDEX_DOCUMENT`] yields
//! the index document's handle instead; opening one without it fails exactly
//! like opening a path that does not exist.
//!
//! Regular files pass through untouched. Hidden names are not this layer's
//! concern; see [`crate::guard`].

use crate::path;
use crate::store::{DirEntry, FileHandle, FileStore, INDEX_DOCUMENT, close_with};
use async_trait::async_trait;
use veil_core::{Error, Result};

/// Store wrapper enforcing the index-or-deny rule for directories
#[derive(Debug, Clone)]
pub struct FilteringFileSystem<S> {
    inner: S,
}

impl<S: FileStore> FilteringFileSystem<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Swap an authorised directory handle for its index document.
    ///
    /// Both handles are closed on every failure path; a close error wins over
    /// whatever error caused the bail-out.
    async fn gate_directory(
        &self,
        path: &str,
        dir: Box<dyn FileHandle>,
    ) -> Result<Box<dyn FileHandle>> {
        let candidate = path::join(path, INDEX_DOCUMENT);

        // Look up the candidate on the inner store; it needs no re-filtering.
        let index = match self.inner.open(&candidate).await {
            Ok(index) => index,
            Err(err) => {
                tracing::debug!("🙈 {} has no {}: {}", path, INDEX_DOCUMENT, err);
                return close_with(dir, Err(err)).await;
            }
        };

        let index_is_dir = match index.stat().await {
            Ok(meta) => meta.is_dir,
            Err(err) => {
                let outcome = close_with(index, Err(err)).await;
                return close_with(dir, outcome).await;
            }
        };
        if index_is_dir {
            tracing::debug!("🙈 {} is a directory, not an index", candidate);
            let outcome = close_with(index, Err(Error::DirectoryWithoutIndex(path.to_string()))).await;
            return close_with(dir, outcome).await;
        }

        if let Err(err) = dir.close().await {
            return close_with(index, Err(err)).await;
        }
        Ok(index)
    }
}

#[async_trait]
impl<S: FileStore> FileStore for FilteringFileSystem<S> {
    async fn open(&self, path: &str) -> Result<Box<dyn FileHandle>> {
        let handle = self.inner.open(path).await?;

        let meta = match handle.stat().await {
            Ok(meta) => meta,
            Err(err) => return close_with(handle, Err(err)).await,
        };

        if meta.is_dir {
            self.gate_directory(path, handle).await
        } else {
            Ok(handle)
        }
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        self.inner.read_dir(path).await
    }
}
