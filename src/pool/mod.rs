// src/pool/mod.rs

//! Bounded job pool.
//!
//! - At most `concurrency` jobs run at once; `submit` waits for a free slot.
//! - Every admitted job runs on its own Tokio task (see [`handler`]).
//! - Job failures are only logged. `wait` fails only when a job task itself
//!   panicked or the slot semaphore was closed.
//! - A shared [`CancelSignal`] stops admission and `wait` drains the jobs
//!   already running. Only an interrupt makes the executor terminate them.
//!
//! Result interpretation is pure and lives in [`verdict`].

pub mod cancel;
pub mod handler;
pub mod verdict;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

use crate::errors::{Result, ThreadmeError};
use crate::exec::Executor;
use crate::source::JobTotal;
use crate::template::Job;

pub use cancel::{CancelSignal, StopReason};
pub use verdict::{evaluate, JobResult, Triggers, Verdict};

/// Per-job settings shared by every handler.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Per-job limit; zero disables it.
    pub timeout: Duration,
    /// Sleep after a job that did not trigger cancellation.
    pub delay: Duration,
    pub triggers: Triggers,
    /// Shown as `[index/total]` in job lines.
    pub total: JobTotal,
}

/// Result of [`JobPool::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The job holds a slot and is running.
    Admitted,
    /// Cancellation was observed first; the job never started.
    Rejected,
}

pub struct JobPool<E: Executor> {
    executor: Arc<E>,
    options: Arc<JobOptions>,
    slots: Arc<Semaphore>,
    cancel: CancelSignal,
    running: JoinSet<()>,
    failure: Option<String>,
}

impl<E: Executor> fmt::Debug for JobPool<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobPool")
            .field("options", &self.options)
            .field("free_slots", &self.slots.available_permits())
            .field("running", &self.running.len())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<E: Executor> JobPool<E> {
    pub fn new(executor: E, concurrency: usize, options: JobOptions, cancel: CancelSignal) -> Self {
        Self {
            executor: Arc::new(executor),
            options: Arc::new(options),
            slots: Arc::new(Semaphore::new(concurrency)),
            cancel,
            running: JoinSet::new(),
            failure: None,
        }
    }

    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    /// Admit `job` once a slot is free, unless the pool gets cancelled first.
    ///
    /// Returns without waiting for the job itself to finish.
    pub async fn submit(&mut self, job: Job) -> Result<Admission> {
        self.reap_finished();

        let permit = tokio::select! {
            biased;

            _ = self.cancel.cancelled() => {
                debug!(index = job.index, "pool cancelled; job not admitted");
                return Ok(Admission::Rejected);
            }

            permit = Arc::clone(&self.slots).acquire_owned() => {
                permit.map_err(|e| ThreadmeError::Pool(format!("job slots unavailable: {e}")))?
            }
        };

        let executor = Arc::clone(&self.executor);
        let options = Arc::clone(&self.options);
        let cancel = self.cancel.clone();

        debug!(index = job.index, cmd = %job.command, "job admitted");
        self.running.spawn(async move {
            // Released when the handler returns, i.e. after the delay.
            let _permit = permit;
            handler::handle_job(job, &*executor, &options, &cancel).await;
        });

        Ok(Admission::Admitted)
    }

    /// Block until every admitted job has finished.
    pub async fn wait(mut self) -> Result<()> {
        while let Some(res) = self.running.join_next().await {
            self.record(res);
        }

        match self.failure.take() {
            Some(msg) => Err(ThreadmeError::Pool(msg)),
            None => Ok(()),
        }
    }

    /// Collect already-finished tasks so an unbounded run does not keep
    /// their join handles around.
    fn reap_finished(&mut self) {
        while let Some(res) = self.running.try_join_next() {
            self.record(res);
        }
    }

    fn record(&mut self, res: std::result::Result<(), JoinError>) {
        if let Err(e) = res {
            error!(error = %e, "job task failed");
            self.failure.get_or_insert_with(|| format!("job task failed: {e}"));
        }
    }
}
