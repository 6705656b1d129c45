//! In-memory store
//!
//! Mostly useful for tests: it counts open calls and outstanding handles so
//! leaks show up as a non-zero [`MemoryStore::outstanding`], can be told to
//! fail every close, and can forbid opens outright.

use crate::path::{self, ROOT};
use crate::store::{self, DirEntry, FileHandle, FileStore, Metadata};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use veil_core::{Error, Result};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Bytes),
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    outstanding: AtomicUsize,
    fail_close: AtomicBool,
    forbid_open: AtomicBool,
}

/// Store backed by a map of paths to contents
#[derive(Debug, Clone)]
pub struct MemoryStore {
    nodes: BTreeMap<String, Node>,
    counters: Arc<Counters>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding only the root directory
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(ROOT.to_string(), Node::Dir);
        Self {
            nodes,
            counters: Arc::default(),
        }
    }

    /// Build a store from `(path, content)` pairs
    pub fn from_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<Bytes>,
    {
        files
            .into_iter()
            .fold(Self::new(), |store, (path, content)| store.with_file(path.as_ref(), content))
    }

    /// Add a file; missing parent directories are created
    pub fn with_file(mut self, path: &str, content: impl Into<Bytes>) -> Self {
        let mut parent = String::new();
        let segments: Vec<&str> = path.split('/').collect();
        for segment in &segments[..segments.len() - 1] {
            parent = if parent.is_empty() {
                segment.to_string()
            } else {
                path::join(&parent, segment)
            };
            self.nodes.entry(parent.clone()).or_insert(Node::Dir);
        }
        self.nodes.insert(path.to_string(), Node::File(content.into()));
        self
    }

    /// Add an empty directory
    pub fn with_dir(mut self, path: &str) -> Self {
        self.nodes.insert(path.to_string(), Node::Dir);
        self
    }

    /// Make every subsequent `close` fail
    pub fn fail_closes(&self, fail: bool) {
        self.counters.fail_close.store(fail, Ordering::SeqCst);
    }

    /// Panic on every subsequent `open`, for code paths that must never reach the store
    pub fn forbid_opens(&self, forbid: bool) {
        self.counters.forbid_open.store(forbid, Ordering::SeqCst);
    }

    /// Number of `open` calls so far, including ones that failed
    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    /// Handles opened and not yet closed
    pub fn outstanding(&self) -> usize {
        self.counters.outstanding.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn open(&self, path: &str) -> Result<Box<dyn FileHandle>> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        assert!(
            !self.counters.forbid_open.load(Ordering::SeqCst),
            "store opened {:?} while opens are forbidden",
            path
        );

        path::validate(path)?;
        let node = self
            .nodes
            .get(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;

        self.counters.outstanding.fetch_add(1, Ordering::SeqCst);

        let (is_dir, content) = match node {
            Node::Dir => (true, None),
            Node::File(bytes) => (false, Some(bytes.clone())),
        };
        Ok(Box::new(MemoryHandle {
            meta: Metadata {
                path: path.to_string(),
                is_dir,
                len: content.as_ref().map_or(0, |c| c.len() as u64),
            },
            content,
            counters: self.counters.clone(),
        }))
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<DirEntry>> {
        path::validate(path)?;
        match self.nodes.get(path) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) => return Err(Error::InvalidPath(path.to_string())),
            None => return Err(Error::NotFound(path.to_string())),
        }

        // BTreeMap order keeps the listing sorted.
        Ok(self
            .nodes
            .iter()
            .filter(|(key, _)| key.as_str() != ROOT && parent_of(key) == path)
            .map(|(key, node)| DirEntry {
                name: path::file_name(key).to_string(),
                is_dir: matches!(node, Node::Dir),
            })
            .collect())
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or(ROOT, |(parent, _)| parent)
}

struct MemoryHandle {
    meta: Metadata,
    content: Option<Bytes>,
    counters: Arc<Counters>,
}

#[async_trait]
impl FileHandle for MemoryHandle {
    async fn stat(&self) -> Result<Metadata> {
        Ok(self.meta.clone())
    }

    async fn read_all(&mut self) -> Result<Bytes> {
        self.content
            .clone()
            .ok_or_else(|| store::is_a_directory(&self.meta.path))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.counters.outstanding.fetch_sub(1, Ordering::SeqCst);
        if self.counters.fail_close.load(Ordering::SeqCst) {
            return Err(Error::HandleClose(format!("{} (injected)", self.meta.path)));
        }
        Ok(())
    }
}
