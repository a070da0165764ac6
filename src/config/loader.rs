// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "SOHD_CONFIG";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the effective configuration for the CLI.
///
/// Lookup order:
/// 1. an explicit path (from `--config`), which must exist
/// 2. `$SOHD_CONFIG`, which must exist when set
/// 3. `Sohd.toml` in the current directory, if present
/// 4. built-in defaults
pub fn resolve_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return load_and_validate(PathBuf::from(path));
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        return load_and_validate(default_path);
    }

    debug!("no config file found; using built-in defaults");
    ConfigFile::try_from(RawConfigFile::default())
}

/// `Sohd.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Sohd.toml")
}
