//! Error types for Veil

use http::StatusCode;
use thiserror::Error;

/// Result type for Veil operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Veil
#[derive(Error, Debug)]
pub enum Error {
    /// No entry exists at the requested path
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path failed the store's validity rules (traversal, malformed segment)
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// Directory exists but has no usable index document
    #[error("Directory without index: {0}")]
    DirectoryWithoutIndex(String),

    /// A path segment starts with the hidden-file marker
    #[error("Hidden path segment: {0}")]
    HiddenSegment(String),

    /// Closing a handle failed
    #[error("Failed to close handle: {0}")]
    HandleClose(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify an I/O error raised while resolving `path`.
    ///
    /// Missing entries become [`Error::NotFound`]; everything else stays an I/O error.
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.to_string()),
            _ => Error::Io(err),
        }
    }

    /// Whether the client should see this as a plain "not found".
    ///
    /// Hidden, invalid and index-less paths are deliberately indistinguishable
    /// from missing ones.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::InvalidPath(_)
                | Error::DirectoryWithoutIndex(_)
                | Error::HiddenSegment(_)
        )
    }

    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> StatusCode {
        if self.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
