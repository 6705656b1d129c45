//! Live directory store

use crate::path::{self, ROOT};
use crate::store::{self, DirEntry, FileHandle, FileStore, Metadata};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use veil_core::{Error, Result};

/// Store reading from a directory on disk
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store rooted at `root`, which must be an existing directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root)
            .map_err(|e| Error::Config(format!("Cannot serve {}: {}", root.display(), e)))?;
        if !root.is_dir() {
            return Err(Error::Config(format!("{} is not a directory", root.display())));
        }
        Ok(Self { root })
    }

    /// Canonical root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn resolve(&self, path: &str) -> Result<PathBuf> {
        path::validate(path)?;
        let joined = if path == ROOT {
            self.root.clone()
        } else {
            self.root.join(path)
        };

        // Symlinks may still point outside the root.
        let resolved = tokio::fs::canonicalize(&joined)
            .await
            .map_err(|e| Error::from_io(path, e))?;
        if !resolved.starts_with(&self.root) {
            tracing::debug!("🚫 {} resolves outside the root: {:?}", path, resolved);
            return Err(Error::InvalidPath(path.to_string()));
        }
        Ok(resolved)
    }
}

#[async_trait]
impl FileStore for DirStore {
    async fn open(&self, path: &str) -> Result<Box<dyn FileHandle>> {
        let full = self.resolve(path).await?;
        let metadata = tokio::fs::metadata(&full)
            .await
            .map_err(|e| Error::from_io(path, e))?;

        if metadata.is_dir() {
            return Ok(Box::new(DirHandle {
                meta: Metadata {
                    path: path.to_string(),
                    is_dir: true,
                    len: 0,
                },
            }));
        }

        let file = tokio::fs::File::open(&full)
            .await
            .map_err(|e| Error::from_io(path, e))?;
        Ok(Box::new(DiskFileHandle {
            meta: Metadata {
                path: path.to_string(),
                is_dir: false,
                len: metadata.len(),
            },
            file,
        }))
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let full = self.resolve(path).await?;
        let mut entries = tokio::fs::read_dir(&full)
            .await
            .map_err(|e| Error::from_io(path, e))?;

        let mut listing = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            listing.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type().await?.is_dir(),
            });
        }
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }
}

struct DirHandle {
    meta: Metadata,
}

#[async_trait]
impl FileHandle for DirHandle {
    async fn stat(&self) -> Result<Metadata> {
        Ok(self.meta.clone())
    }

    async fn read_all(&mut self) -> Result<Bytes> {
        Err(store::is_a_directory(&self.meta.path))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

struct DiskFileHandle {
    meta: Metadata,
    file: tokio::fs::File,
}

#[async_trait]
impl FileHandle for DiskFileHandle {
    async fn stat(&self) -> Result<Metadata> {
        Ok(self.meta.clone())
    }

    async fn read_all(&mut self) -> Result<Bytes> {
        let mut content = Vec::with_capacity(self.meta.len as usize);
        self.file.read_to_end(&mut content).await?;
        Ok(Bytes::from(content))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let DiskFileHandle { meta, mut file } = *self;
        // Waits for any in-flight blocking operation before the descriptor is dropped.
        file.flush()
            .await
            .map_err(|e| Error::HandleClose(format!("{}: {}", meta.path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, DirStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>home</h1>").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/styles.css"), "body {}").unwrap();
        std::fs::write(dir.path().join(".env"), "SECRET=1").unwrap();
        let store = DirStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_file() {
        let (_dir, store) = fixture();
        let mut handle = store.open("css/styles.css").await.unwrap();
        let meta = handle.stat().await.unwrap();
        assert!(!meta.is_dir);
        assert_eq!(meta.len, 7);
        assert_eq!(handle.read_all().await.unwrap(), Bytes::from("body {}"));
        handle.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_root_and_subdir() {
        let (_dir, store) = fixture();
        for path in [".", "css"] {
            let handle = store.open(path).await.unwrap();
            assert!(handle.stat().await.unwrap().is_dir, "{}", path);
            handle.close().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_missing_and_traversal() {
        let (_dir, store) = fixture();
        assert!(matches!(store.open("missing.txt").await, Err(Error::NotFound(_))));
        assert!(matches!(store.open("../etc/passwd").await, Err(Error::InvalidPath(_))));
        assert!(matches!(store.open("/etc/passwd").await, Err(Error::InvalidPath(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_rejected() {
        let (dir, store) = fixture();
        let outside = tempfile::tempdir().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "nope").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();

        assert!(matches!(
            store.open("escape/secret.txt").await,
            Err(Error::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_read_dir_sorted() {
        let (_dir, store) = fixture();
        let names: Vec<String> = store
            .read_dir(".")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec![".env", "css", "index.html"]);
    }

    #[test]
    fn test_root_must_be_directory() {
        let (dir, _store) = fixture();
        assert!(matches!(DirStore::new(dir.path().join("index.html")), Err(Error::Config(_))));
        assert!(matches!(DirStore::new(dir.path().join("nope")), Err(Error::Config(_))));
    }
}
