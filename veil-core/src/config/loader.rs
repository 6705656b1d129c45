//! Configuration loader

use crate::config::VeilConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration loader for various formats
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<VeilConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match ext {
            "json" => Self::from_json(&content)?,
            "toml" | "" => Self::from_toml(&content)?,
            _ => return Err(Error::Config(format!("Unknown config format: {}", ext))),
        };

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<VeilConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<VeilConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_json_loading() {
        let json = r#"{"listen": ":8080", "root": "public"}"#;
        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.root, Some(PathBuf::from("public")));
        assert!(config.list_on_start);
    }

    #[test]
    fn test_toml_defaults() {
        let config = ConfigLoader::from_toml("").unwrap();
        assert_eq!(config.listen, "127.0.0.1:5000");
        assert!(config.root.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_loading_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veil.toml");
        std::fs::write(
            &path,
            "listen = \"127.0.0.1:9000\"\nlist_on_start = false\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.listen, "127.0.0.1:9000");
        assert!(!config.list_on_start);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("veil.yaml");
        std::fs::write(&path, "listen: x").unwrap();

        assert!(matches!(ConfigLoader::load(&path), Err(Error::Config(_))));
    }
}
