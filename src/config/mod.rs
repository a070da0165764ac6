// src/config/mod.rs

//! Configuration loading and validation for sohd.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate paths, the interval and the mail fields (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve_config};
pub use model::{
    CheckSection, ConfigFile, DaemonSection, NotifySection, RawConfigFile, RawScriptSection,
    ScriptConfig,
};
pub use validate::validate_raw_config;
