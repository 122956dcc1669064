//! Platform directory resolution for config and store paths.

use crate::error::ApiError;
use std::path::PathBuf;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "remold", "remold")
}

/// Path of the user config file (`~/.config/remold/config.toml` on Linux),
/// or `None` when the platform provides no home directory.
pub fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default store database directory, created on demand.
pub fn store_dir() -> Result<PathBuf, ApiError> {
    let dirs = project_dirs().ok_or_else(|| {
        ApiError::ConfigError("could not determine platform data directory".to_string())
    })?;
    let dir = dirs.data_dir().join("store");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
