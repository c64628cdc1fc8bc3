// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Individual job failures are *not* represented here; those are
//! [`crate::exec::ExecError`] values that only ever get logged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThreadmeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Job pool failure: {0}")]
    Pool(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ThreadmeError>;
