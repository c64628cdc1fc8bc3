// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the `Executor` trait plus `ExecOutput` /
//!   `ExecError`, so the pool can be driven by a fake in tests.
//! - [`shell`] is the real implementation built on
//!   `tokio::process::Command`.
//! - [`process_group`] signals a child's whole process group when its
//!   timeout expires or the run is interrupted (SIGTERM, then SIGKILL).

pub mod backend;
pub mod process_group;
pub mod shell;

pub use backend::{ExecError, ExecOutput, Executor};
pub use shell::{Interpreter, ShellExecutor, DEFAULT_INTERPRETER};
