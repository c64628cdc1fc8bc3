// src/config/mod.rs

//! Run configuration for threadme.
//!
//! Responsibilities:
//! - Define the raw (CLI / TOML) and validated data model (`model.rs`).
//! - Load an optional job file and merge it with the CLI (`loader.rs`).
//! - Validate the merged options (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve};
pub use model::{RawRunConfig, RunConfig};
