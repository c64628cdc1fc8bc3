// src/dispatch.rs

//! Dispatch loop: pull items from the source, materialize, submit.
//!
//! This is the only place that decides when to stop pulling from a source,
//! which is what makes forever mode safe to express as an infinite iterator.

use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::Executor;
use crate::pool::{Admission, JobPool};
use crate::source::JobSource;
use crate::template::Job;

/// What the loop did before it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub submitted: u64,
    /// True when cancellation ended the loop rather than source exhaustion.
    pub stopped_early: bool,
}

/// Submit one job per source item until the source ends or the pool's
/// cancel signal is observed. Does not wait for jobs to finish.
pub async fn dispatch<E: Executor>(
    source: JobSource,
    template: &str,
    pool: &mut JobPool<E>,
) -> Result<DispatchStats> {
    let mut stats = DispatchStats {
        submitted: 0,
        stopped_early: false,
    };

    for item in source {
        if pool.cancel_signal().is_cancelled() {
            stats.stopped_early = true;
            break;
        }

        let job = Job::from_item(template, &item);
        match pool.submit(job).await? {
            Admission::Admitted => stats.submitted += 1,
            Admission::Rejected => {
                stats.stopped_early = true;
                break;
            }
        }
    }

    if stats.stopped_early {
        info!(submitted = stats.submitted, "dispatch stopped by cancellation");
    } else {
        debug!(submitted = stats.submitted, "job source exhausted");
    }

    Ok(stats)
}
