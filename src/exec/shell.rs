// src/exec/shell.rs

//! Real executor: runs each command as `<interpreter> -c <command>`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::sleep;
use tracing::debug;

use super::backend::{ExecError, ExecOutput, Executor};
use super::process_group;
use crate::pool::CancelSignal;

pub const DEFAULT_INTERPRETER: &str = "/bin/sh";

/// Program used to run commands; it receives `-c <command>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    program: PathBuf,
}

impl Interpreter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Drop a redundant leading `<program> -c ` so templates written as
    /// full shell invocations are not wrapped twice.
    pub fn strip_invocation<'a>(&self, command: &'a str) -> &'a str {
        let prefix = format!("{} -c ", self.program.display());
        command.strip_prefix(prefix.as_str()).unwrap_or(command)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPRETER)
    }
}

/// Executor that spawns one interpreter process per command, each in its
/// own process group.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    interpreter: Interpreter,
}

impl ShellExecutor {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }

    async fn run(&self, command: &str, timeout: Duration, cancel: &CancelSignal) -> ExecOutput {
        let program = self.interpreter.program();

        let mut cmd = Command::new(program);
        cmd.arg("-c")
            .arg(self.interpreter.strip_invocation(command))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                return ExecOutput::failed(ExecError::Spawn {
                    program: program.display().to_string(),
                    source,
                });
            }
        };

        let pgid = child.id();

        // Waits for exit *and* for both pipes to close, so descendants that
        // keep stdout open hold the job until they exit or get signalled.
        let waiting = child.wait_with_output();
        tokio::pin!(waiting);

        let deadline = async {
            if timeout.is_zero() {
                std::future::pending::<()>().await;
            } else {
                sleep(timeout).await;
            }
        };

        let (ending, early) = tokio::select! {
            biased;

            waited = &mut waiting => (Ending::Exited, Some(waited)),
            _ = deadline => (Ending::TimedOut, None),
            _ = cancel.interrupted() => (Ending::Interrupted, None),
        };

        let waited = match early {
            Some(waited) => waited,
            None => {
                debug!(?pgid, ?ending, "stopping job process group");
                stop_group(pgid, waiting.as_mut()).await
            }
        };

        match waited {
            Ok(output) => {
                let error = match ending {
                    _ if output.status.success() => None,
                    Ending::TimedOut => Some(ExecError::TimedOut {
                        timeout,
                        status: output.status,
                    }),
                    Ending::Interrupted => Some(ExecError::Interrupted(output.status)),
                    Ending::Exited => Some(ExecError::Failed(output.status)),
                };

                debug!(status = %output.status, ?ending, "job process finished");

                ExecOutput {
                    stdout: output.stdout,
                    stderr: output.stderr,
                    error,
                    timed_out: ending == Ending::TimedOut,
                }
            }
            Err(e) => ExecOutput {
                timed_out: ending == Ending::TimedOut,
                ..ExecOutput::failed(ExecError::Wait(e))
            },
        }
    }
}

impl Executor for ShellExecutor {
    fn execute<'a>(
        &'a self,
        command: &'a str,
        timeout: Duration,
        cancel: &'a CancelSignal,
    ) -> Pin<Box<dyn Future<Output = ExecOutput> + Send + 'a>> {
        Box::pin(self.run(command, timeout, cancel))
    }
}

/// What made a job stop running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Exited,
    TimedOut,
    Interrupted,
}

/// SIGTERM the group, then SIGKILL it if it is still holding the job open
/// after [`process_group::KILL_GRACE`].
async fn stop_group<F: Future>(pgid: Option<u32>, mut waiting: Pin<&mut F>) -> F::Output {
    let Some(pgid) = pgid else {
        return waiting.await;
    };

    process_group::terminate(pgid);
    match tokio::time::timeout(process_group::KILL_GRACE, waiting.as_mut()).await {
        Ok(waited) => waited,
        Err(_) => {
            debug!(pgid, "process group ignored SIGTERM; killing");
            process_group::kill(pgid);
            waiting.await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_redundant_shell_invocation() {
        let sh = Interpreter::default();
        assert_eq!(sh.strip_invocation("/bin/sh -c echo hi"), "echo hi");
        assert_eq!(sh.strip_invocation("echo /bin/sh -c"), "echo /bin/sh -c");

        let bash = Interpreter::new("/bin/bash");
        assert_eq!(bash.strip_invocation("/bin/sh -c echo hi"), "/bin/sh -c echo hi");
    }
}
