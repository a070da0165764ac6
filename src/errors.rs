// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SohdError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A detach step failed. Always fatal: the caller exits non-zero.
    #[error("Daemonize failed during {step}: {source}")]
    Daemonize {
        step: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Mail command failed: {0}")]
    MailError(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SohdError>;
