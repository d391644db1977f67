//! Test run orchestration.

use crate::comment::{CommentOutcome, PrCommenter};
use crate::config::CiConfig;
use crate::error::Result;
use crate::pr::PrContext;
use crate::runner::{RunOutcome, TestRunner};
use std::path::Path;
use tracing::{info, warn};

/// Result of a complete testgate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// How the test run ended.
    pub outcome: RunOutcome,

    /// PR target, resolved only when failures were found.
    pub pr: Option<PrContext>,

    /// Comment result, present only when posting is enabled.
    pub comment: Option<CommentOutcome>,
}

impl PipelineReport {
    /// Failed tests found in the run.
    pub fn failed_tests(&self) -> &[String] {
        self.outcome.failed_tests()
    }

    /// Whether the run should fail the build.
    pub fn has_failures(&self) -> bool {
        !self.failed_tests().is_empty()
    }
}

/// Test run orchestrator.
pub struct CiPipeline;

impl CiPipeline {
    /// Run the tests at `test_path` and report on any failures.
    ///
    /// Only an invocation error is returned as `Err`. Comment problems are
    /// logged and recorded in the report.
    pub async fn run(config: &CiConfig, test_path: &Path) -> Result<PipelineReport> {
        let outcome = TestRunner::run(&config.tool, test_path).await?;

        let report = match &outcome {
            RunOutcome::NoTestsCollected => {
                info!(path = %test_path.display(), "No tests collected");
                None
            }
            RunOutcome::Passed => {
                info!(path = %test_path.display(), "Tests passed");
                None
            }
            RunOutcome::Failed(report) => {
                info!(failed = report.failed_count(), "Tests failed");
                Some(report)
            }
        };

        let Some(report) = report.filter(|r| !r.is_empty()) else {
            return Ok(PipelineReport {
                outcome,
                pr: None,
                comment: None,
            });
        };

        let pr = PrContext::resolve(config);
        info!(
            repo = %pr.repo_slug,
            pr_number = pr.pr_number.as_deref().unwrap_or("-"),
            "Resolved pull request"
        );

        let comment = if config.post_comments {
            Some(Self::post_comment(config, &pr, &report.failed_tests, &report.summary).await)
        } else {
            info!("PR comments disabled");
            None
        };

        Ok(PipelineReport {
            outcome,
            pr: Some(pr),
            comment,
        })
    }

    async fn post_comment(
        config: &CiConfig,
        pr: &PrContext,
        failed_tests: &[String],
        summary: &str,
    ) -> CommentOutcome {
        match Self::try_post_comment(config, pr, failed_tests, summary).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Error posting comment");
                CommentOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_post_comment(
        config: &CiConfig,
        pr: &PrContext,
        failed_tests: &[String],
        summary: &str,
    ) -> Result<CommentOutcome> {
        let commenter = PrCommenter::new(&config.api_base_url, config.token.clone())?;
        commenter
            .comment_on_pr(&pr.repo_slug, pr.pr_number.as_deref(), failed_tests, summary)
            .await
    }
}
