//! Veil Core Library
//!
//! This crate provides the shared pieces of the Veil static file server:
//! configuration loading, the request handler seam and error handling.

pub mod config;
pub mod error;
pub mod server;

pub use error::{Error, Result};

/// Veil version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
