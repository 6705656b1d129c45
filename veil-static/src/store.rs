//! File store abstraction
//!
//! Every backing the server can read from (a live directory, a bundle
//! compiled into the binary, an in-memory map) implements [`FileStore`].
//! Handles must be released with [`FileHandle::close`] so close errors are
//! observed rather than lost in a `Drop`.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use veil_core::Result;

/// Document a directory must contain to be served
pub const INDEX_DOCUMENT: &str = "index.html";

/// Metadata of an open handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Store path the handle was opened with
    pub path: String,
    pub is_dir: bool,
    /// Content length in bytes, zero for directories
    pub len: u64,
}

/// A child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// An open file or directory
#[async_trait]
pub trait FileHandle: Send + Sync {
    /// Metadata of the opened entry
    async fn stat(&self) -> Result<Metadata>;

    /// Full content of a regular file
    async fn read_all(&mut self) -> Result<Bytes>;

    /// Release the handle
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Read-only hierarchical store
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Open the entry at `path`
    async fn open(&self, path: &str) -> Result<Box<dyn FileHandle>>;

    /// List the children of the directory at `path`, sorted by name
    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>>;
}

#[async_trait]
impl<S: FileStore + ?Sized> FileStore for Arc<S> {
    async fn open(&self, path: &str) -> Result<Box<dyn FileHandle>> {
        (**self).open(path).await
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        (**self).read_dir(path).await
    }
}

/// Close `handle`, then yield `outcome`.
///
/// A close failure replaces `outcome`.
pub async fn close_with<T>(handle: Box<dyn FileHandle>, outcome: Result<T>) -> Result<T> {
    handle.close().await?;
    outcome
}

pub(crate) fn is_a_directory(path: &str) -> veil_core::Error {
    veil_core::Error::Io(std::io::Error::new(
        std::io::ErrorKind::IsADirectory,
        format!("{} is a directory", path),
    ))
}
