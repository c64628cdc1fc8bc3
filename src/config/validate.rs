// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    RawRunConfig, RunConfig, DEFAULT_CONCURRENCY, DEFAULT_COUNT, DEFAULT_DELAY_MS,
    DEFAULT_TIMEOUT_MS,
};
use crate::errors::{Result, ThreadmeError};
use crate::exec::Interpreter;
use crate::pool::Triggers;
use crate::source::SourceSpec;

const EXAMPLE: &str = "`threadme -c 5 --cmd 'echo \"{{N}}:{{LINE}}\"'`";

impl TryFrom<RawRunConfig> for RunConfig {
    type Error = ThreadmeError;

    fn try_from(raw: RawRunConfig) -> std::result::Result<Self, Self::Error> {
        let command = validate_command(&raw)?;
        let concurrency = validate_concurrency(&raw)?;
        let source = resolve_source(&raw)?;

        let delay = delay_from_ms(raw.delay_ms.unwrap_or(DEFAULT_DELAY_MS));
        let timeout = Duration::from_millis(raw.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS));
        let triggers = Triggers::new(raw.stop_on, raw.continue_while);
        let interpreter = raw.shell.map(Interpreter::new).unwrap_or_default();

        Ok(RunConfig::new_unchecked(
            command,
            source,
            concurrency,
            delay,
            timeout,
            triggers,
            interpreter,
        ))
    }
}

fn validate_command(cfg: &RawRunConfig) -> Result<String> {
    let command = cfg.cmd.as_deref().unwrap_or_default().trim();
    if command.is_empty() {
        return Err(ThreadmeError::ConfigError(format!(
            "empty command. {EXAMPLE}"
        )));
    }
    Ok(command.to_string())
}

fn validate_concurrency(cfg: &RawRunConfig) -> Result<usize> {
    let concurrency = cfg.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
    if concurrency <= 1 {
        return Err(ThreadmeError::ConfigError(format!(
            "concurrency must be > 1 (got {concurrency}); a single worker is just a loop"
        )));
    }
    Ok(concurrency)
}

fn resolve_source(cfg: &RawRunConfig) -> Result<SourceSpec> {
    let forever = cfg.forever.unwrap_or(false);
    match (&cfg.file, forever) {
        (Some(path), true) => Err(ThreadmeError::ConfigError(format!(
            "`forever` cannot be combined with a job file ({})",
            path.display()
        ))),
        (Some(path), false) => Ok(SourceSpec::Lines(path.clone())),
        (None, true) => Ok(SourceSpec::Forever),
        (None, false) => Ok(SourceSpec::Count(cfg.count.unwrap_or(DEFAULT_COUNT))),
    }
}

/// Negative delays are clamped to 1 ms.
fn delay_from_ms(ms: i64) -> Duration {
    if ms < 0 {
        Duration::from_millis(1)
    } else {
        Duration::from_millis(ms as u64)
    }
}
