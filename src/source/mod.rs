// src/source/mod.rs

//! Job sources: where job indices and `{{LINE}}` values come from.
//!
//! A [`JobSource`] is a lazy iterator of [`JobItem`]s. Three mutually
//! exclusive modes exist:
//! - `Count(n)`: indices `0..n`, the line is the index itself
//! - `Lines(path)`: one item per line of a file, in file order
//! - `Forever`: unbounded indices and no line at all

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{Result, ThreadmeError};
use crate::fs::FileSystem;

/// Configured source of jobs, before any file is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Count(u64),
    Lines(PathBuf),
    Forever,
}

/// One unit of work produced by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobItem {
    pub index: u64,
    /// Substitution for `{{LINE}}`; `None` in forever mode.
    pub line: Option<String>,
}

/// Total number of jobs a source will produce, as shown in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTotal {
    Finite(u64),
    Unbounded,
}

impl fmt::Display for JobTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobTotal::Finite(n) => write!(f, "{n}"),
            JobTotal::Unbounded => f.write_str("∞"),
        }
    }
}

#[derive(Debug)]
enum Mode {
    Count { total: u64 },
    Lines { lines: std::vec::IntoIter<String>, total: u64 },
    Forever,
}

/// Lazy, strictly increasing sequence of [`JobItem`]s starting at index 0.
#[derive(Debug)]
pub struct JobSource {
    mode: Mode,
    next_index: u64,
}

impl JobSource {
    pub fn count(n: u64) -> Self {
        Self::with_mode(Mode::Count { total: n })
    }

    pub fn lines(lines: Vec<String>) -> Self {
        let total = lines.len() as u64;
        Self::with_mode(Mode::Lines {
            lines: lines.into_iter(),
            total,
        })
    }

    pub fn forever() -> Self {
        Self::with_mode(Mode::Forever)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            next_index: 0,
        }
    }

    /// Build a source from its description. For `Lines` the whole file is read
    /// here, so an unreadable file fails before any job runs.
    pub fn open(spec: &SourceSpec, fs: &dyn FileSystem) -> Result<Self> {
        match spec {
            SourceSpec::Count(n) => Ok(Self::count(*n)),
            SourceSpec::Lines(path) => Ok(Self::lines(read_lines(fs, path)?)),
            SourceSpec::Forever => Ok(Self::forever()),
        }
    }

    pub fn total(&self) -> JobTotal {
        match &self.mode {
            Mode::Count { total } | Mode::Lines { total, .. } => JobTotal::Finite(*total),
            Mode::Forever => JobTotal::Unbounded,
        }
    }
}

impl Iterator for JobSource {
    type Item = JobItem;

    fn next(&mut self) -> Option<JobItem> {
        let index = self.next_index;
        let line = match &mut self.mode {
            Mode::Count { total } => {
                if index >= *total {
                    return None;
                }
                Some(index.to_string())
            }
            Mode::Lines { lines, .. } => Some(lines.next()?),
            Mode::Forever => None,
        };

        self.next_index += 1;
        Some(JobItem { index, line })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.mode {
            Mode::Count { total } => {
                let left = total.saturating_sub(self.next_index) as usize;
                (left, Some(left))
            }
            Mode::Lines { lines, .. } => lines.size_hint(),
            Mode::Forever => (usize::MAX, None),
        }
    }
}

/// Read a job file and split it into lines (`\n` or `\r\n`).
pub fn read_lines(fs: &dyn FileSystem, path: &Path) -> Result<Vec<String>> {
    if !fs.is_file(path) {
        return Err(ThreadmeError::ConfigError(format!(
            "job file {} does not exist or is not a file",
            path.display()
        )));
    }

    let contents = fs.read_to_string(path).map_err(|e| {
        ThreadmeError::ConfigError(format!("cannot read job file {}: {e:#}", path.display()))
    })?;

    let lines: Vec<String> = contents.lines().map(str::to_string).collect();
    debug!(path = %path.display(), lines = lines.len(), "job file loaded");
    Ok(lines)
}
