use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use threadme::exec::{ExecOutput, Executor};
use threadme::pool::CancelSignal;

/// Canned result for a command.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    pub stdout: String,
    pub stderr: String,
    /// How long the fake job "runs".
    pub runtime: Duration,
}

impl Scripted {
    pub fn stdout(text: &str) -> Self {
        Self {
            stdout: text.to_string(),
            ..Self::default()
        }
    }

    pub fn stderr(text: &str) -> Self {
        Self {
            stderr: text.to_string(),
            ..Self::default()
        }
    }

    pub fn taking(mut self, runtime: Duration) -> Self {
        self.runtime = runtime;
        self
    }
}

/// A fake executor that:
/// - records which commands were started, in start order
/// - tracks how many commands run at the same time (and the peak)
/// - stops a running command early when the run is interrupted
/// - answers with a scripted result per command, or echoes the command
///   back on stdout when nothing is scripted.
///
/// Clones share all state, so a test can keep one handle and give the
/// other to the pool.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    scripts: Arc<Mutex<HashMap<String, Scripted>>>,
    default_runtime: Duration,
    started: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime for commands without a script.
    pub fn with_default_runtime(mut self, runtime: Duration) -> Self {
        self.default_runtime = runtime;
        self
    }

    pub fn script(self, command: &str, result: Scripted) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(command.to_string(), result);
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Executor for FakeExecutor {
    fn execute<'a>(
        &'a self,
        command: &'a str,
        _timeout: Duration,
        cancel: &'a CancelSignal,
    ) -> Pin<Box<dyn Future<Output = ExecOutput> + Send + 'a>> {
        Box::pin(async move {
            self.started.lock().unwrap().push(command.to_string());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let script = self.scripts.lock().unwrap().get(command).cloned();
            let script = script.unwrap_or_else(|| Scripted {
                stdout: command.to_string(),
                stderr: String::new(),
                runtime: self.default_runtime,
            });

            // An interrupt cuts the fake job short, like a terminated process.
            let finished = tokio::select! {
                _ = tokio::time::sleep(script.runtime) => true,
                _ = cancel.interrupted() => false,
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if !finished {
                return ExecOutput {
                    stderr: b"interrupted".to_vec(),
                    ..ExecOutput::default()
                };
            }

            ExecOutput {
                stdout: script.stdout.into_bytes(),
                stderr: script.stderr.into_bytes(),
                error: None,
                timed_out: false,
            }
        })
    }
}
