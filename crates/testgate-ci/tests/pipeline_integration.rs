//! Integration tests for the test pipeline against fake test tools.
#![cfg(unix)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use testgate_ci::{CiConfig, CiError, CiPipeline, CommentOutcome, RunOutcome, TestRunner, TestTool};

/// Write a shell script that prints `stdout` and exits with `code`.
fn fake_tool(dir: &TempDir, stdout: &str, code: i32) -> TestTool {
    let script: PathBuf = dir.path().join("fake_pytest.sh");
    let body = format!("cat <<'__OUTPUT__'\n{stdout}\n__OUTPUT__\nexit {code}\n");
    std::fs::write(&script, body).expect("write script");
    TestTool::custom(vec!["sh".to_string(), script.to_string_lossy().into_owned()])
}

const FAILING_OUTPUT: &str = "\
============================= test session starts ==============================
collected 3 items

tests/test_math.py .F.                                                   [100%]

=========================== short test summary info ============================
FAILED tests/test_math.py::test_add - assert 1 == 2
FAILED tests/test_math.py::test_sub
  assert 5 == 4

========================= 2 failed, 1 passed in 0.03s ==========================";

/// Test: exit 5 means nothing was collected, even with FAILED lines present
#[tokio::test]
async fn test_no_tests_collected() {
    let dir = TempDir::new().expect("tempdir");
    let tool = fake_tool(&dir, "FAILED ignored\nno tests ran in 0.01s", 5);
    let config = CiConfig::default().with_tool(tool);

    let report = CiPipeline::run(&config, Path::new("tests"))
        .await
        .expect("pipeline failed");

    assert_eq!(report.outcome, RunOutcome::NoTestsCollected);
    assert!(!report.has_failures());
    assert!(report.pr.is_none(), "No PR logic should run");
}

/// Test: exit 0 yields no failures and no PR resolution
#[tokio::test]
async fn test_passing_run() {
    let dir = TempDir::new().expect("tempdir");
    let tool = fake_tool(&dir, "3 passed in 0.01s", 0);
    let config = CiConfig::default()
        .with_tool(tool)
        .with_github_ref("refs/pull/42/merge");

    let report = CiPipeline::run(&config, Path::new("tests"))
        .await
        .expect("pipeline failed");

    assert_eq!(report.outcome, RunOutcome::Passed);
    assert!(report.failed_tests().is_empty());
    assert!(report.pr.is_none());
    assert!(report.comment.is_none());
}

/// Test: failures are extracted and the PR context resolved, comments stay off
#[tokio::test]
async fn test_failing_run_extracts_failures() {
    let dir = TempDir::new().expect("tempdir");
    let tool = fake_tool(&dir, FAILING_OUTPUT, 1);
    let config = CiConfig::default()
        .with_tool(tool)
        .with_repo_slug("acme/widgets")
        .with_github_ref("refs/pull/42/merge")
        .with_token("ghp_unused");

    let report = CiPipeline::run(&config, Path::new("tests"))
        .await
        .expect("pipeline failed");

    assert!(report.has_failures());
    assert_eq!(
        report.failed_tests(),
        [
            "FAILED tests/test_math.py::test_add - assert 1 == 2".to_string(),
            "FAILED tests/test_math.py::test_sub".to_string(),
        ]
    );
    match &report.outcome {
        RunOutcome::Failed(failures) => assert_eq!(
            failures.summary,
            "**FAILED tests/test_math.py::test_add - assert 1 == 2**\n\
             **FAILED tests/test_math.py::test_sub**\n\
             > assert 5 == 4"
        ),
        other => panic!("expected failure, got {other:?}"),
    }

    let pr = report.pr.expect("PR context resolved");
    assert_eq!(pr.repo_slug, "acme/widgets");
    assert_eq!(pr.pr_number.as_deref(), Some("42"));
    assert!(report.comment.is_none(), "Comments are disabled by default");
}

/// Test: posting enabled without a token skips quietly
#[tokio::test]
async fn test_post_comments_without_token_skips() {
    let dir = TempDir::new().expect("tempdir");
    let tool = fake_tool(&dir, "FAILED t::x\n", 1);
    let config = CiConfig::default()
        .with_tool(tool)
        .with_pr_id("7")
        .with_api_base_url("http://127.0.0.1:1")
        .with_post_comments(true);

    let report = CiPipeline::run(&config, Path::new("tests"))
        .await
        .expect("pipeline failed");

    assert!(report.has_failures());
    assert_eq!(report.comment, Some(CommentOutcome::SkippedNoToken));
}

/// Test: an unreachable API is recorded, not raised
#[tokio::test]
async fn test_unreachable_api_is_not_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let tool = fake_tool(&dir, "FAILED t::x\n", 1);
    let config = CiConfig::default()
        .with_tool(tool)
        .with_pr_id("7")
        .with_token("ghp_test")
        .with_api_base_url("http://127.0.0.1:1")
        .with_post_comments(true);

    let report = CiPipeline::run(&config, Path::new("tests"))
        .await
        .expect("pipeline failed");

    assert!(matches!(report.comment, Some(CommentOutcome::Failed { .. })));
}

/// Test: a non-zero exit with no FAILED lines does not count as failures
#[tokio::test]
async fn test_error_exit_without_markers() {
    let dir = TempDir::new().expect("tempdir");
    let tool = fake_tool(&dir, "ERROR collecting tests/test_broken.py", 2);
    let config = CiConfig::default().with_tool(tool);

    let report = CiPipeline::run(&config, Path::new("tests"))
        .await
        .expect("pipeline failed");

    assert!(matches!(report.outcome, RunOutcome::Failed(_)));
    assert!(!report.has_failures());
    assert!(report.pr.is_none());
}

/// Test: a missing tool is an invocation error
#[tokio::test]
async fn test_missing_tool_is_fatal() {
    let config = CiConfig::default().with_tool(TestTool::custom(vec![
        "/nonexistent/testgate/pytest".to_string(),
    ]));

    let err = CiPipeline::run(&config, Path::new("tests"))
        .await
        .expect_err("spawn should fail");

    assert!(matches!(err, CiError::Spawn { .. }));
    assert!(err.to_string().contains("/nonexistent/testgate/pytest"));
}

/// Test: the tool receives the path and the short traceback flag
#[tokio::test]
async fn test_tool_receives_path_and_flag() {
    let dir = TempDir::new().expect("tempdir");
    let script = dir.path().join("args.sh");
    std::fs::write(&script, "printf '%s\\n' \"$@\"\n").expect("write script");
    let tool = TestTool::custom(vec!["sh".to_string(), script.to_string_lossy().into_owned()]);

    let result = TestRunner::execute(&tool, Path::new("tests/unit"))
        .await
        .expect("execute failed");

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout, "tests/unit\n--tb=short\n");
}
