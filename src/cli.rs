// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every run option is an `Option` here so that values from a `--config`
//! job file can fill in whatever was not given on the command line. The
//! merged result is validated in [`crate::config`].

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `threadme`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "threadme",
    version,
    about = "Run a shell command many times in parallel.",
    after_help = "Example: threadme -c 5 --cmd 'echo \"{{N}}:{{LINE}}\"'"
)]
pub struct CliArgs {
    /// Command to execute. `{{N}}` is replaced by the job index and
    /// `{{LINE}}` by the input line.
    #[arg(long, value_name = "TEMPLATE")]
    pub cmd: Option<String>,

    /// File to read; one job per line, the line replaces `{{LINE}}`.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Number of jobs running at the same time (must be > 1).
    #[arg(short = 'c', long = "concurrency", value_name = "C")]
    pub concurrency: Option<usize>,

    /// Delay in milliseconds after each completed job. Negative values
    /// become 1 ms.
    #[arg(
        short = 'd',
        long = "delay",
        value_name = "MS",
        allow_negative_numbers = true
    )]
    pub delay_ms: Option<i64>,

    /// Time limit for a single job in milliseconds (0 disables it).
    #[arg(long = "tl", visible_alias = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Number of jobs to run when no file is given.
    #[arg(short = 'n', long = "count", value_name = "N")]
    pub count: Option<u64>,

    /// Stop everything once any job's output or error contains this text.
    #[arg(long = "stop-on", value_name = "TEXT")]
    pub stop_on: Option<String>,

    /// Keep running only while every job's output contains this text.
    #[arg(long = "while", value_name = "TEXT")]
    pub continue_while: Option<String>,

    /// Run with increasing `{{N}}` until a stop condition fires.
    #[arg(long, conflicts_with = "file")]
    pub forever: bool,

    /// Turn off `forever = true` from the job file.
    #[arg(long, overrides_with = "forever")]
    pub no_forever: bool,

    /// Interpreter used to run commands as `<shell> -c <command>`.
    #[arg(long, value_name = "PATH")]
    pub shell: Option<PathBuf>,

    /// Optional TOML job file providing defaults for the options above.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `THREADME_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the banner and the first commands, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
