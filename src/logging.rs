// src/logging.rs

//! Logging setup for `threadme` using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from, in order:
//! 1. `--log-level` (applies to everything)
//! 2. `THREADME_LOG`, read as `EnvFilter` directives, e.g. `debug` or
//!    `info,threadme::exec=debug` to trace process handling only
//! 3. `info`
//!
//! Logs (including the per-job result lines) go to STDERR; stdout only
//! carries the startup banner and dry-run listing.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "THREADME_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. Fails on an unparsable `THREADME_LOG` or
/// if a subscriber is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let from_env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, from_env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, from_env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(directive(level)));
    }

    match from_env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {LOG_ENV} value {directives:?}")),
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn cli_level_beats_environment() {
        let filter = build_filter(Some(LogLevel::Warn), Some("trace")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn environment_accepts_per_module_directives() {
        let filter = build_filter(None, Some(" info,threadme::exec=debug ")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn blank_environment_falls_back_to_info() {
        let filter = build_filter(None, Some("  ")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        assert!(build_filter(None, None).is_ok());
    }

    #[test]
    fn malformed_environment_is_rejected() {
        let err = build_filter(None, Some("threadme=loud")).unwrap_err();
        assert!(err.to_string().contains(LOG_ENV));
    }
}
