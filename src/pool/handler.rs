// src/pool/handler.rs

//! Lifecycle of one admitted job: execute, log, evaluate, then either
//! cancel the run or sleep the inter-completion delay.

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::exec::Executor;
use crate::report;
use crate::template::Job;

use super::JobOptions;
use super::cancel::CancelSignal;
use super::verdict::{evaluate, JobResult, Verdict};

pub async fn handle_job<E: Executor + ?Sized>(
    job: Job,
    executor: &E,
    options: &JobOptions,
    cancel: &CancelSignal,
) {
    let output = executor.execute(&job.command, options.timeout, cancel).await;
    let result = JobResult::from_output(&output);

    report::log_job(&job, options.total, &result);

    match evaluate(&options.triggers, job.index, &result) {
        Verdict::Proceed => {
            if !options.delay.is_zero() {
                sleep(options.delay).await;
            }
        }
        Verdict::Stop(reason) => {
            warn!("> {reason}");
            if !cancel.cancel(reason) {
                debug!(index = job.index, "run already cancelled");
            }
        }
    }
}
