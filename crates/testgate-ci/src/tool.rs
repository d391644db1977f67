//! Test tool definitions.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Traceback flag appended to every invocation.
pub const SHORT_TRACEBACK_FLAG: &str = "--tb=short";

/// Exit code pytest uses when no tests were collected.
pub const EXIT_NO_TESTS_COLLECTED: i32 = 5;

/// Configuration for the test tool that gets invoked against a path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestTool {
    /// Command prefix (first element is the executable).
    pub command: Vec<String>,

    /// Timeout in seconds (0 = wait indefinitely).
    pub timeout_secs: u64,
}

impl Default for TestTool {
    fn default() -> Self {
        Self::pytest()
    }
}

impl TestTool {
    /// The builtin `pytest` tool.
    pub fn pytest() -> Self {
        Self {
            command: vec!["pytest".to_string()],
            timeout_secs: 0,
        }
    }

    /// A custom tool, e.g. `python -m pytest`.
    pub fn custom(command: Vec<String>) -> Self {
        Self {
            command,
            timeout_secs: 0,
        }
    }

    /// Set a timeout for the run.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Display name used in logs and errors.
    pub fn name(&self) -> String {
        self.command.join(" ")
    }

    /// Full argv for a run against `test_path`: `<command...> <path> --tb=short`.
    pub fn argv(&self, test_path: &Path) -> Vec<String> {
        let mut argv = self.command.clone();
        argv.push(test_path.to_string_lossy().into_owned());
        argv.push(SHORT_TRACEBACK_FLAG.to_string());
        argv
    }
}
