//! Store over a bundle compiled into the binary with `include_dir!`

use crate::path::{self, ROOT};
use crate::store::{self, DirEntry, FileHandle, FileStore, Metadata};
use async_trait::async_trait;
use bytes::Bytes;
use include_dir::Dir;
use veil_core::{Error, Result};

/// Store serving an embedded directory tree
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedStore {
    root: &'static Dir<'static>,
}

impl EmbeddedStore {
    pub fn new(root: &'static Dir<'static>) -> Self {
        Self { root }
    }

    fn dir(&self, path: &str) -> Result<Option<&'static Dir<'static>>> {
        path::validate(path)?;
        if path == ROOT {
            return Ok(Some(self.root));
        }
        match self.root.get_entry(path) {
            Some(entry) => Ok(entry.as_dir()),
            None => Err(Error::NotFound(path.to_string())),
        }
    }
}

#[async_trait]
impl FileStore for EmbeddedStore {
    async fn open(&self, path: &str) -> Result<Box<dyn FileHandle>> {
        if self.dir(path)?.is_some() {
            return Ok(Box::new(EmbeddedHandle {
                meta: Metadata {
                    path: path.to_string(),
                    is_dir: true,
                    len: 0,
                },
                content: None,
            }));
        }

        let file = self
            .root
            .get_file(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        let content = Bytes::from_static(file.contents());
        Ok(Box::new(EmbeddedHandle {
            meta: Metadata {
                path: path.to_string(),
                is_dir: false,
                len: content.len() as u64,
            },
            content: Some(content),
        }))
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        let dir = self
            .dir(path)?
            .ok_or_else(|| Error::InvalidPath(path.to_string()))?;

        let mut listing: Vec<DirEntry> = dir
            .entries()
            .iter()
            .filter_map(|entry| {
                let name = entry.path().file_name()?.to_string_lossy().into_owned();
                Some(DirEntry {
                    name,
                    is_dir: entry.as_dir().is_some(),
                })
            })
            .collect();
        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }
}

struct EmbeddedHandle {
    meta: Metadata,
    content: Option<Bytes>,
}

#[async_trait]
impl FileHandle for EmbeddedHandle {
    async fn stat(&self) -> Result<Metadata> {
        Ok(self.meta.clone())
    }

    async fn read_all(&mut self) -> Result<Bytes> {
        self.content
            .clone()
            .ok_or_else(|| store::is_a_directory(&self.meta.path))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
