// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::Interpreter;
use crate::pool::Triggers;
use crate::source::SourceSpec;

pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_DELAY_MS: i64 = 10;
pub const DEFAULT_TIMEOUT_MS: u64 = 60 * 1000;
pub const DEFAULT_COUNT: u64 = 100;

/// Unchecked run options, as read from a TOML job file and/or the CLI.
///
/// A job file mirrors the command-line flags:
///
/// ```toml
/// cmd = "curl -s https://example.test/items/{{LINE}}"
/// file = "ids.txt"
/// concurrency = 8
/// delay_ms = 0
/// timeout_ms = 5000
/// stop_on = "rate limited"
/// ```
///
/// Every key is optional; missing values fall back to the CLI, then to the
/// `DEFAULT_*` constants.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRunConfig {
    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Milliseconds; negative values are clamped to 1 during validation.
    #[serde(default)]
    pub delay_ms: Option<i64>,

    /// Milliseconds; `0` disables the per-job timeout.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub count: Option<u64>,

    #[serde(default)]
    pub stop_on: Option<String>,

    #[serde(default, rename = "while")]
    pub continue_while: Option<String>,

    #[serde(default)]
    pub shell: Option<PathBuf>,

    #[serde(default)]
    pub forever: Option<bool>,
}

impl RawRunConfig {
    /// Fill every unset field of `self` from `fallback`.
    pub fn or(self, fallback: RawRunConfig) -> RawRunConfig {
        RawRunConfig {
            cmd: self.cmd.or(fallback.cmd),
            file: self.file.or(fallback.file),
            concurrency: self.concurrency.or(fallback.concurrency),
            delay_ms: self.delay_ms.or(fallback.delay_ms),
            timeout_ms: self.timeout_ms.or(fallback.timeout_ms),
            count: self.count.or(fallback.count),
            stop_on: self.stop_on.or(fallback.stop_on),
            continue_while: self.continue_while.or(fallback.continue_while),
            shell: self.shell.or(fallback.shell),
            forever: self.forever.or(fallback.forever),
        }
    }
}

/// Validated run configuration.
///
/// Only obtainable through `RunConfig::try_from(RawRunConfig)`, which
/// rejects empty commands, concurrency <= 1 and `forever` combined with a
/// file.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Trimmed command template.
    pub command: String,
    pub source: SourceSpec,
    pub concurrency: usize,
    /// Pause after each completed job (at least 1 ms when configured
    /// negative).
    pub delay: Duration,
    /// Per-job limit; `Duration::ZERO` disables it.
    pub timeout: Duration,
    pub triggers: Triggers,
    pub interpreter: Interpreter,
}

impl RunConfig {
    pub(crate) fn new_unchecked(
        command: String,
        source: SourceSpec,
        concurrency: usize,
        delay: Duration,
        timeout: Duration,
        triggers: Triggers,
        interpreter: Interpreter,
    ) -> Self {
        Self {
            command,
            source,
            concurrency,
            delay,
            timeout,
            triggers,
            interpreter,
        }
    }
}
