// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pool;
pub mod report;
pub mod source;
pub mod template;

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::RunConfig;
use crate::dispatch::dispatch;
use crate::errors::Result;
use crate::exec::{Executor, ShellExecutor};
use crate::fs::RealFileSystem;
use crate::pool::{CancelSignal, JobOptions, JobPool};
use crate::report::RunReport;
use crate::source::JobSource;
use crate::template::Job;

/// Number of commands shown by `--dry-run`.
const DRY_RUN_PREVIEW: usize = 5;

/// Exit status after a second Ctrl-C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI + optional job file)
/// - the job source (the job file is read here, before anything runs)
/// - the startup banner
/// - the shell executor, job pool and dispatch loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunReport> {
    let cfg = config::resolve(&args)?;
    let source = JobSource::open(&cfg.source, &RealFileSystem)?;

    report::print_banner(&cfg, source.total());

    if args.dry_run {
        print_dry_run(&cfg, source);
        return Ok(RunReport {
            submitted: 0,
            elapsed: Default::default(),
            stop_reason: None,
        });
    }

    let cancel = CancelSignal::new();

    // First Ctrl-C: stop admitting jobs and terminate the running ones.
    // Second Ctrl-C: exit without waiting for them.
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            cancel.interrupt();
            warn!("> Interrupted; terminating running jobs (Ctrl+C again to exit now)");

            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("> Interrupted twice; exiting");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
    };

    let executor = ShellExecutor::new(cfg.interpreter.clone());
    let report = execute(&cfg, source, executor, cancel).await;

    ctrl_c.abort();
    report
}

/// Run every job from `source` through `executor` under the limits in `cfg`.
///
/// Cancellation (from a trigger or from `cancel` being set externally)
/// stops admission; running jobs are drained before this returns.
pub async fn execute<E: Executor>(
    cfg: &RunConfig,
    source: JobSource,
    executor: E,
    cancel: CancelSignal,
) -> Result<RunReport> {
    let started = Instant::now();

    let observer = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            cancel.cancelled().await;
            info!("> Stopping all workers!");
        })
    };

    let options = JobOptions {
        timeout: cfg.timeout,
        delay: cfg.delay,
        triggers: cfg.triggers.clone(),
        total: source.total(),
    };
    let mut pool = JobPool::new(executor, cfg.concurrency, options, cancel.clone());

    let dispatched = dispatch(source, &cfg.command, &mut pool).await;
    // Drain admitted jobs even when dispatch itself failed.
    let drained = pool.wait().await;
    let stats = match dispatched.and_then(|stats| drained.map(|()| stats)) {
        Ok(stats) => stats,
        Err(e) => {
            observer.abort();
            return Err(e);
        }
    };

    let report = RunReport {
        submitted: stats.submitted,
        elapsed: started.elapsed(),
        stop_reason: cancel.reason(),
    };

    if report.was_cancelled() {
        // Let the observer print its notice before the summary.
        let _ = observer.await;
    } else {
        observer.abort();
    }
    info!("> Duration: {:?}", report.elapsed);

    Ok(report)
}

/// Dry-run output: the first few materialized commands.
fn print_dry_run(cfg: &RunConfig, source: JobSource) {
    println!("threadme dry-run (first {DRY_RUN_PREVIEW} commands)");
    for item in source.take(DRY_RUN_PREVIEW) {
        let job = Job::from_item(&cfg.command, &item);
        println!("  [{}] {}", job.index, job.command);
    }
    debug!("dry-run complete (no execution)");
}
