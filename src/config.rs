//! Configuration
//!
//! Layered configuration for the client: defaults, the XDG config file, an
//! optional explicit file, and `REMOLD_*` environment overrides, merged in
//! that order.

pub mod facade;
pub mod merge;
pub mod xdg;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RemoldConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Migrator service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the migrator API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Migration calls stream archives back and
    /// can run long.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1/migrator".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Local store settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Store database path; `None` resolves to the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RemoldConfig::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000/api/v1/migrator");
        assert_eq!(config.backend.timeout_secs, 300);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RemoldConfig =
            toml::from_str("[backend]\nbase_url = \"https://migrator.example/api\"\n").unwrap();
        assert_eq!(config.backend.base_url, "https://migrator.example/api");
        assert_eq!(config.backend.timeout_secs, 300);
    }
}
