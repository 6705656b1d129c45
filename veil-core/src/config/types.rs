//! Configuration type definitions
//!
//! These types represent the runtime configuration for Veil.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for Veil
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeilConfig {
    /// Address to listen on
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Live directory to serve. `None` serves the bundle compiled into the binary.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Log the served tree at startup
    #[serde(default = "default_true")]
    pub list_on_start: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for VeilConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            root: None,
            list_on_start: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl VeilConfig {
    /// Normalised listen address; a bare `:port` binds every interface.
    pub fn listen_addr(&self) -> String {
        if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
