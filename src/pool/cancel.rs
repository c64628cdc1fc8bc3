// src/pool/cancel.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Why a run was cancelled. The first reason wins; later ones are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The stop-on text appeared in a job's stdout.
    StopOnOutput { index: u64, needle: String },
    /// The stop-on text appeared in a job's error text.
    StopOnError { index: u64, needle: String },
    /// A job's stdout lacked the continue-while text.
    RequirementMissing { index: u64, required: String },
    /// Ctrl-C.
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::StopOnOutput { index, needle } => {
                write!(f, "stop message {needle:?} found in output of job {index}")
            }
            StopReason::StopOnError { index, needle } => {
                write!(f, "stop message {needle:?} found in error of job {index}")
            }
            StopReason::RequirementMissing { index, required } => {
                write!(f, "required message {required:?} missing from output of job {index}")
            }
            StopReason::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// One-way, idempotent cancellation flag shared by the dispatch loop, every
/// job handler, the executor and the stop observer.
///
/// Cancelling stops admission only. Interrupting also tells the executor to
/// terminate jobs that are still running. Clones share the same state and
/// neither flag ever resets.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<Option<StopReason>>>,
    interrupt_tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        let (interrupt_tx, _rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            interrupt_tx: Arc::new(interrupt_tx),
        }
    }

    /// Cancel with [`StopReason::Interrupted`] (unless a reason is already
    /// recorded) and ask running jobs to terminate. Returns `true` only for
    /// the first call.
    pub fn interrupt(&self) -> bool {
        self.cancel(StopReason::Interrupted);
        self.interrupt_tx.send_if_modified(|interrupted| {
            !std::mem::replace(interrupted, true)
        })
    }

    pub fn is_interrupted(&self) -> bool {
        *self.interrupt_tx.borrow()
    }

    /// Resolves once [`interrupt`](Self::interrupt) has been called.
    pub async fn interrupted(&self) {
        let mut rx = self.interrupt_tx.subscribe();
        let _ = rx.wait_for(|interrupted| *interrupted).await;
    }

    /// Trigger cancellation. Returns `true` only for the call that actually
    /// flipped the signal.
    pub fn cancel(&self, reason: StopReason) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_some() {
                return false;
            }
            *state = Some(reason);
            true
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn reason(&self) -> Option<StopReason> {
        self.tx.borrow().clone()
    }

    /// Resolves once the signal is set (immediately if it already is).
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so this cannot see a closed channel.
        let _ = rx.wait_for(Option::is_some).await;
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_reason_wins() {
        let signal = CancelSignal::new();
        assert!(!signal.is_cancelled());

        assert!(signal.cancel(StopReason::Interrupted));
        assert!(!signal.cancel(StopReason::StopOnOutput {
            index: 3,
            needle: "x".into()
        }));

        assert!(signal.clone().is_cancelled());
        assert_eq!(signal.reason(), Some(StopReason::Interrupted));
    }

    #[tokio::test]
    async fn waiters_wake_on_cancel() {
        let signal = CancelSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.cancelled().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        signal.cancel(StopReason::Interrupted);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter should not panic");
    }

    #[test]
    fn stop_trigger_does_not_interrupt() {
        let signal = CancelSignal::new();
        signal.cancel(StopReason::RequirementMissing {
            index: 0,
            required: "ok".into(),
        });
        assert!(!signal.is_interrupted());
    }

    #[tokio::test]
    async fn interrupt_after_stop_keeps_first_reason() {
        let signal = CancelSignal::new();
        signal.cancel(StopReason::StopOnOutput {
            index: 2,
            needle: "FAIL".into(),
        });

        assert!(signal.interrupt());
        assert!(!signal.interrupt());
        assert!(signal.is_interrupted());
        assert!(matches!(signal.reason(), Some(StopReason::StopOnOutput { index: 2, .. })));

        tokio::time::timeout(Duration::from_millis(100), signal.interrupted())
            .await
            .expect("interrupted signal should resolve at once");
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_set() {
        let signal = CancelSignal::new();
        signal.cancel(StopReason::Interrupted);
        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("already-cancelled signal should resolve at once");
    }
}
