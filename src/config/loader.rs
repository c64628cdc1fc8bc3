// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawRunConfig, RunConfig};
use crate::errors::Result;

/// Load a TOML job file from a given path and return the raw `RawRunConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] or [`resolve`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawRunConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawRunConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a job file from path and validate it on its own (no CLI overlay).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RunConfig> {
    let raw = load_from_path(&path)?;
    RunConfig::try_from(raw)
}

/// Build the effective run configuration from the command line.
///
/// - If `--config` is given, the job file is loaded first.
/// - Flags given on the command line override values from the file.
/// - The merged result is validated into a [`RunConfig`].
pub fn resolve(args: &CliArgs) -> Result<RunConfig> {
    let from_file = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawRunConfig::default(),
    };

    let merged = RawRunConfig::from(args).or(from_file);
    RunConfig::try_from(merged)
}

impl From<&CliArgs> for RawRunConfig {
    fn from(args: &CliArgs) -> Self {
        RawRunConfig {
            cmd: args.cmd.clone(),
            file: args.file.clone(),
            concurrency: args.concurrency,
            delay_ms: args.delay_ms,
            timeout_ms: args.timeout_ms,
            count: args.count,
            stop_on: args.stop_on.clone(),
            continue_while: args.continue_while.clone(),
            shell: args.shell.clone(),
            forever: match (args.forever, args.no_forever) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
        }
    }
}
