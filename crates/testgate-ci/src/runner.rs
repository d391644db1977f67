//! Test tool execution and outcome classification.

use crate::error::{CiError, Result};
use crate::extract::{extract_failures, FailureReport};
use crate::tool::{TestTool, EXIT_NO_TESTS_COLLECTED};
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

/// Raw result of one test tool invocation.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Exit code (-1 when terminated by a signal).
    pub exit_code: i32,

    /// Captured stdout, where the tool writes its report.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// What a test run amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The tool collected no tests (exit code 5).
    NoTestsCollected,

    /// All tests passed (exit code 0).
    Passed,

    /// The tool exited with any other code.
    Failed(FailureReport),
}

impl RunOutcome {
    /// Failed tests, empty unless the run failed.
    pub fn failed_tests(&self) -> &[String] {
        match self {
            RunOutcome::Failed(report) => &report.failed_tests,
            _ => &[],
        }
    }
}

impl RunResult {
    /// Map the exit code to an outcome, extracting failures when needed.
    pub fn classify(&self) -> RunOutcome {
        match self.exit_code {
            EXIT_NO_TESTS_COLLECTED => RunOutcome::NoTestsCollected,
            0 => RunOutcome::Passed,
            _ => RunOutcome::Failed(extract_failures(&self.stdout)),
        }
    }
}

/// Runs the configured test tool against a path.
pub struct TestRunner;

impl TestRunner {
    /// Invoke `<tool> <path> --tb=short` and capture its output.
    ///
    /// A non-zero exit is not an error; only failing to start or wait on
    /// the tool is.
    pub async fn execute(tool: &TestTool, test_path: &Path) -> Result<RunResult> {
        let start = Instant::now();

        if tool.command.is_empty() {
            return Err(CiError::EmptyCommand);
        }
        let argv = tool.argv(test_path);

        let exe = &argv[0];
        let args = &argv[1..];

        info!(tool = %tool.name(), path = %test_path.display(), "Running tests");

        let spawn_err = |source| CiError::Spawn {
            tool: tool.name(),
            source,
        };

        let child = Command::new(exe)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        let output = if tool.timeout_secs > 0 {
            tokio::time::timeout(
                std::time::Duration::from_secs(tool.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| CiError::Timeout {
                tool: tool.name(),
                timeout_secs: tool.timeout_secs,
            })?
            .map_err(spawn_err)?
        } else {
            child.wait_with_output().await.map_err(spawn_err)?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().unwrap_or(-1);

        debug!(exit_code, duration_ms, "Test tool finished");

        Ok(RunResult {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms,
        })
    }

    /// Execute and classify in one step.
    pub async fn run(tool: &TestTool, test_path: &Path) -> Result<RunOutcome> {
        let result = Self::execute(tool, test_path).await?;
        Ok(result.classify())
    }
}
