//! Failure extraction from test tool output.
//!
//! Scans raw output line by line for pytest's short summary markers
//! (`FAILED path::test - reason`) and collects the lines that directly
//! follow each marker as assertion detail. Detection is purely prefix and
//! blank-line based; the tool's report format is not otherwise parsed.

use serde::{Deserialize, Serialize};

/// Marker pytest puts at the start of each failed test line.
pub const FAILED_PREFIX: &str = "FAILED ";

/// Failed tests and a Markdown summary extracted from a test run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Trimmed `FAILED ` lines in output order.
    pub failed_tests: Vec<String>,

    /// Bolded failure lines, each followed by its quoted detail lines.
    pub summary: String,
}

impl FailureReport {
    /// Number of failed tests.
    pub fn failed_count(&self) -> usize {
        self.failed_tests.len()
    }

    /// Whether no failures were found.
    pub fn is_empty(&self) -> bool {
        self.failed_tests.is_empty()
    }
}

/// Extract failed tests and their detail lines from raw tool output.
pub fn extract_failures(output: &str) -> FailureReport {
    let mut failed_tests = Vec::new();
    let mut summary = Vec::new();
    let mut capturing = false;

    for line in output.split('\n') {
        let trimmed = line.trim();
        if line.starts_with(FAILED_PREFIX) {
            failed_tests.push(trimmed.to_string());
            summary.push(format!("**{trimmed}**"));
            capturing = true;
        } else if capturing && !trimmed.is_empty() {
            summary.push(format!("> {trimmed}"));
        } else {
            capturing = false;
        }
    }

    FailureReport {
        failed_tests,
        summary: summary.join("\n"),
    }
}
