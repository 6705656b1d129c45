//! Veil Static File Module
//!
//! Secure static file access:
//! - A [`FileStore`] capability set with directory, embedded and in-memory backings
//! - [`FilteringFileSystem`], which only lets directories through via their index document
//! - [`HiddenPathGuard`], which refuses dotfile paths before any store access
//! - [`FileServer`], the request handler that ties them to HTTP

mod dir_store;
mod embedded;
mod file_server;
mod filter;
pub mod guard;
mod memory;
mod mime;
pub mod path;
mod store;
mod tree;

pub use dir_store::DirStore;
pub use embedded::EmbeddedStore;
pub use file_server::{FileServer, ServedFile};
pub use filter::FilteringFileSystem;
pub use guard::{HiddenPathGuard, is_hidden_path};
pub use memory::MemoryStore;
pub use mime::{content_type, guess_mime_type};
pub use store::{DirEntry, FileHandle, FileStore, INDEX_DOCUMENT, Metadata, close_with};
pub use tree::list_tree;

/// Full request pipeline over `store`: hidden path guard, then the file
/// server bound to an index-or-deny view of the store.
pub fn secure_handler<S: FileStore>(store: S) -> HiddenPathGuard<FileServer<FilteringFileSystem<S>>> {
    HiddenPathGuard::new(FileServer::new(FilteringFileSystem::new(store)))
}
