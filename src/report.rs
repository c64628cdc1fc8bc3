// src/report.rs

//! Human-readable output: per-job log lines, the startup banner and the
//! final run report.

use std::time::Duration;

use tracing::{error, info};

use crate::config::RunConfig;
use crate::pool::{JobResult, StopReason};
use crate::source::{JobTotal, SourceSpec};
use crate::template::Job;

/// `[index/total] [command] ==> [text]`, prefixed `ERROR: ` on failure.
pub fn format_job_line(job: &Job, total: JobTotal, result: &JobResult) -> String {
    if result.is_error() {
        format!(
            "ERROR: [{}/{}] [{}] ==> [{}]",
            job.index, total, job.command, result.error
        )
    } else {
        format!(
            "[{}/{}] [{}] ==> [{}]",
            job.index, total, job.command, result.output
        )
    }
}

pub fn log_job(job: &Job, total: JobTotal, result: &JobResult) {
    let line = format_job_line(job, total, result);
    if result.is_error() {
        error!("{line}");
    } else {
        info!("{line}");
    }
}

/// Startup summary printed to stdout before any job runs.
pub fn print_banner(cfg: &RunConfig, total: JobTotal) {
    println!("{:>20}: [{}]", "Command", cfg.command);
    match &cfg.source {
        SourceSpec::Lines(path) => {
            println!("{:>20}: [{}]", "File to read", path.display());
            println!("{:>20}: [{}]", "Lines in file", total);
        }
        SourceSpec::Count(n) => println!("{:>20}: [{}]", "Job count to perform", n),
        SourceSpec::Forever => println!("{:>20}: [{}]", "Job count to perform", "forever"),
    }
    println!("{:>20}: [{}]", "Threads", cfg.concurrency);
    println!("{:>20}: {} ms", "Delay", cfg.delay.as_millis());
    if cfg.timeout.is_zero() {
        println!("{:>20}: none", "Timeout for single job");
    } else {
        println!("{:>20}: {} ms", "Timeout for single job", cfg.timeout.as_millis());
    }
    if let Some(stop_on) = cfg.triggers.stop_on() {
        println!("{:>20}: '{}'", "Stop if contains", stop_on);
    }
    if let Some(required) = cfg.triggers.continue_while() {
        println!("{:>20}: '{}'", "Run while contains", required);
    }
    println!("{:>20}: [{}]", "Shell", cfg.interpreter.program().display());
    println!("{}", "-".repeat(80));
}

/// Outcome of a whole run, used by `main` to pick the exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Jobs admitted into the pool.
    pub submitted: u64,
    pub elapsed: Duration,
    /// Set when the run was cancelled by a trigger or Ctrl-C.
    pub stop_reason: Option<StopReason>,
}

impl RunReport {
    pub fn was_cancelled(&self) -> bool {
        self.stop_reason.is_some()
    }

    pub fn exit_code(&self) -> i32 {
        if self.was_cancelled() { 1 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job {
            index: 4,
            command: "echo 4".to_string(),
        }
    }

    #[test]
    fn success_line_shows_output() {
        let res = JobResult {
            output: "4".into(),
            error: String::new(),
        };
        assert_eq!(
            format_job_line(&job(), JobTotal::Finite(10), &res),
            "[4/10] [echo 4] ==> [4]"
        );
    }

    #[test]
    fn error_line_is_prefixed_and_shows_error() {
        let res = JobResult {
            output: "ignored".into(),
            error: "exit status: 2".into(),
        };
        assert_eq!(
            format_job_line(&job(), JobTotal::Unbounded, &res),
            "ERROR: [4/∞] [echo 4] ==> [exit status: 2]"
        );
    }

    #[test]
    fn exit_code_follows_cancellation() {
        let mut report = RunReport {
            submitted: 3,
            elapsed: Duration::from_millis(5),
            stop_reason: None,
        };
        assert_eq!(report.exit_code(), 0);

        report.stop_reason = Some(StopReason::Interrupted);
        assert_eq!(report.exit_code(), 1);
    }
}
