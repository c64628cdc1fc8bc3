// src/exec/process_group.rs

//! Signalling a spawned process together with everything it started.
//!
//! Children are placed in their own process group (`process_group(0)`),
//! so the group id equals the child's pid and a single `killpg` reaches
//! subshells and background jobs too.

use std::time::Duration;

use tracing::warn;

/// How long a group gets to exit after SIGTERM before it is sent SIGKILL.
pub const KILL_GRACE: Duration = Duration::from_secs(2);

/// Ask the group to exit (SIGTERM).
pub fn terminate(pgid: u32) {
    signal_group(pgid, GroupSignal::Terminate);
}

/// Force the group down (SIGKILL).
pub fn kill(pgid: u32) {
    signal_group(pgid, GroupSignal::Kill);
}

#[derive(Debug, Clone, Copy)]
enum GroupSignal {
    Terminate,
    Kill,
}

#[cfg(unix)]
fn signal_group(pgid: u32, sig: GroupSignal) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let signal = match sig {
        GroupSignal::Terminate => Signal::SIGTERM,
        GroupSignal::Kill => Signal::SIGKILL,
    };

    if let Err(e) = killpg(Pid::from_raw(pgid as i32), signal) {
        // Typically ESRCH: the whole group already exited.
        warn!(pgid, ?signal, error = %e, "could not signal process group");
    }
}

#[cfg(not(unix))]
fn signal_group(pgid: u32, sig: GroupSignal) {
    warn!(pgid, ?sig, "process group signals are only supported on unix");
}
