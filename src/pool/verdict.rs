// src/pool/verdict.rs

//! Pure result interpretation for a finished job.
//!
//! No Tokio, no processes: turns an [`ExecOutput`] into a [`JobResult`]
//! and decides whether the run may continue.

use crate::exec::ExecOutput;

use super::cancel::StopReason;

/// Stop / continue conditions for a run. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triggers {
    stop_on: Option<String>,
    continue_while: Option<String>,
}

impl Triggers {
    pub fn new(stop_on: Option<String>, continue_while: Option<String>) -> Self {
        Self {
            stop_on: stop_on.filter(|s| !s.is_empty()),
            continue_while: continue_while.filter(|s| !s.is_empty()),
        }
    }

    pub fn stop_on(&self) -> Option<&str> {
        self.stop_on.as_deref()
    }

    pub fn continue_while(&self) -> Option<&str> {
        self.continue_while.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.stop_on.is_some() || self.continue_while.is_some()
    }
}

/// Trimmed, text form of a job's outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResult {
    /// Trimmed stdout.
    pub output: String,
    /// Trimmed stderr and execution error, joined by `"; "`. Empty on success.
    pub error: String,
}

impl JobResult {
    pub fn from_output(out: &ExecOutput) -> Self {
        let stderr = String::from_utf8_lossy(&out.stderr);
        let exec_error = out.error.as_ref().map(ToString::to_string);

        let error = [Some(stderr.trim()), exec_error.as_deref().map(str::trim)]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            output: String::from_utf8_lossy(&out.stdout).trim().to_string(),
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

/// What the handler should do after logging a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Apply the inter-completion delay and release the slot.
    Proceed,
    /// Cancel the run; no delay.
    Stop(StopReason),
}

/// Evaluate continue-while first, then stop-on (stdout before error text).
pub fn evaluate(triggers: &Triggers, index: u64, result: &JobResult) -> Verdict {
    if let Some(required) = triggers.continue_while() {
        if !result.output.contains(required) {
            return Verdict::Stop(StopReason::RequirementMissing {
                index,
                required: required.to_string(),
            });
        }
    }

    if let Some(needle) = triggers.stop_on() {
        if result.output.contains(needle) {
            return Verdict::Stop(StopReason::StopOnOutput {
                index,
                needle: needle.to_string(),
            });
        }
        if result.error.contains(needle) {
            return Verdict::Stop(StopReason::StopOnError {
                index,
                needle: needle.to_string(),
            });
        }
    }

    Verdict::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecError;

    fn result(output: &str, error: &str) -> JobResult {
        JobResult {
            output: output.to_string(),
            error: error.to_string(),
        }
    }

    #[test]
    fn empty_trigger_strings_are_ignored() {
        let triggers = Triggers::new(Some(String::new()), Some(String::new()));
        assert!(!triggers.is_configured());
        assert_eq!(evaluate(&triggers, 0, &result("", "")), Verdict::Proceed);
    }

    #[test]
    fn stop_on_matches_output_or_error() {
        let triggers = Triggers::new(Some("FAIL".into()), None);

        assert_eq!(
            evaluate(&triggers, 1, &result("it FAILed", "")),
            Verdict::Stop(StopReason::StopOnOutput { index: 1, needle: "FAIL".into() })
        );
        assert_eq!(
            evaluate(&triggers, 2, &result("", "FAIL: disk; exit status: 1")),
            Verdict::Stop(StopReason::StopOnError { index: 2, needle: "FAIL".into() })
        );
        assert_eq!(evaluate(&triggers, 3, &result("ok", "")), Verdict::Proceed);
    }

    #[test]
    fn continue_while_requires_text_in_stdout() {
        let triggers = Triggers::new(None, Some("200 OK".into()));

        assert_eq!(evaluate(&triggers, 0, &result("HTTP 200 OK", "")), Verdict::Proceed);
        assert_eq!(
            evaluate(&triggers, 5, &result("", "200 OK")),
            Verdict::Stop(StopReason::RequirementMissing { index: 5, required: "200 OK".into() })
        );
    }

    #[test]
    fn continue_while_is_checked_before_stop_on() {
        let triggers = Triggers::new(Some("boom".into()), Some("ok".into()));
        assert!(matches!(
            evaluate(&triggers, 0, &result("boom", "")),
            Verdict::Stop(StopReason::RequirementMissing { .. })
        ));
    }

    #[test]
    fn error_text_joins_stderr_and_exec_error() {
        let out = ExecOutput {
            stdout: b"  partial \n".to_vec(),
            stderr: b"\n disk full \n".to_vec(),
            error: Some(ExecError::Wait(std::io::Error::other("gone"))),
            timed_out: false,
        };

        let res = JobResult::from_output(&out);
        assert_eq!(res.output, "partial");
        assert_eq!(res.error, "disk full; failed waiting for process: gone");
        assert!(res.is_error());
    }

    #[test]
    fn stderr_only_still_counts_as_error() {
        let out = ExecOutput {
            stdout: b"fine".to_vec(),
            stderr: b"warning: deprecated\n".to_vec(),
            ..ExecOutput::default()
        };
        assert_eq!(JobResult::from_output(&out).error, "warning: deprecated");
    }

    #[test]
    fn clean_run_has_no_error() {
        let out = ExecOutput {
            stdout: b"\n\n".to_vec(),
            ..ExecOutput::default()
        };
        let res = JobResult::from_output(&out);
        assert!(!res.is_error());
        assert_eq!(res.output, "");
    }
}
