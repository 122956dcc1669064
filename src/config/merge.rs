//! MergeService: composes config sources and deserializes to RemoldConfig.

use crate::config::{xdg, RemoldConfig};
use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: defaults (lowest) -> XDG file -> environment (highest).
    pub fn load() -> Result<RemoldConfig, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&RemoldConfig::default())?);
        if let Some(path) = xdg::config_file_path() {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(env_source());
        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<RemoldConfig, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&RemoldConfig::default())?)
            .add_source(File::from(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

/// `REMOLD_*` prefix with `__` as separator for nested keys, e.g.
/// `REMOLD_BACKEND__BASE_URL`.
fn env_source() -> Environment {
    Environment::with_prefix("REMOLD")
        .separator("__")
        .try_parsing(true)
}
