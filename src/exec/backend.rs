// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The job pool talks to an `Executor` instead of spawning processes
//! directly. Production uses [`super::ShellExecutor`]; tests can provide an
//! executor that scripts outputs or records concurrency without touching
//! the OS.

use std::future::Future;
use std::pin::Pin;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

use crate::pool::CancelSignal;

/// Why a single job did not succeed.
///
/// These never abort a run; the pool only logs them.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("{0}")]
    Failed(ExitStatus),

    #[error("timed out after {timeout:?} ({status})")]
    TimedOut { timeout: Duration, status: ExitStatus },

    #[error("interrupted ({0})")]
    Interrupted(ExitStatus),
}

/// Fully buffered result of one command.
#[derive(Debug, Default)]
pub struct ExecOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub error: Option<ExecError>,
    /// Whether the timeout timer fired while the process was running.
    pub timed_out: bool,
}

impl ExecOutput {
    /// Output of a process that could not be run at all: no buffers.
    pub fn failed(error: ExecError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Trait abstracting how a single materialized command is executed.
pub trait Executor: Send + Sync + 'static {
    /// Run `command` to completion, terminating it once `timeout` elapses
    /// or `cancel` is interrupted, whichever comes first.
    ///
    /// A zero `timeout` means no limit.
    fn execute<'a>(
        &'a self,
        command: &'a str,
        timeout: Duration,
        cancel: &'a CancelSignal,
    ) -> Pin<Box<dyn Future<Output = ExecOutput> + Send + 'a>>;
}
