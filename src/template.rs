// src/template.rs

//! Command templates and job materialization.
//!
//! Substitution is plain text replacement. Nothing is quoted or escaped;
//! the template author is responsible for quoting `{{LINE}}`.

use crate::source::JobItem;

pub const INDEX_PLACEHOLDER: &str = "{{N}}";
pub const LINE_PLACEHOLDER: &str = "{{LINE}}";

/// Replace every `{{N}}` with `index` and, when a line is present, every
/// `{{LINE}}` with it. Without a line `{{LINE}}` is left as-is.
pub fn materialize(template: &str, index: u64, line: Option<&str>) -> String {
    let command = template.replace(INDEX_PLACEHOLDER, &index.to_string());
    match line {
        Some(line) => command.replace(LINE_PLACEHOLDER, line),
        None => command,
    }
}

/// A single concrete job: its source index and the command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub index: u64,
    pub command: String,
}

impl Job {
    pub fn from_item(template: &str, item: &JobItem) -> Self {
        Self {
            index: item.index,
            command: materialize(template, item.index, item.line.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_all_occurrences() {
        let cmd = materialize("echo {{N}} {{LINE}} {{N}}-{{LINE}}", 4, Some("x"));
        assert_eq!(cmd, "echo 4 x 4-x");
    }

    #[test]
    fn line_placeholder_survives_without_line() {
        assert_eq!(materialize("run {{N}} {{LINE}}", 9, None), "run 9 {{LINE}}");
    }

    #[test]
    fn substituted_text_is_not_rescanned_or_escaped() {
        // A line that itself looks like a placeholder is inserted verbatim.
        assert_eq!(materialize("echo '{{LINE}}'", 1, Some("{{N}} $HOME")), "echo '{{N}} $HOME'");
    }

    #[test]
    fn job_from_count_item() {
        let item = JobItem { index: 2, line: Some("2".into()) };
        let job = Job::from_item("echo \"{{N}}:{{LINE}}\"", &item);
        assert_eq!(job.command, "echo \"2:2\"");
        assert_eq!(job.index, 2);
    }
}
