//! Pull request comments via the GitHub REST API.
//!
//! Posting is best effort: a missing token or PR number skips the request,
//! and a rejected request is logged rather than failing the run.

use crate::error::{CiError, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{error, info};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// What happened when a comment was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    /// No token configured; nothing was sent.
    SkippedNoToken,

    /// No PR number resolved; nothing was sent.
    SkippedNoPrNumber,

    /// The API answered 201 Created.
    Posted,

    /// The API answered with any other status.
    Rejected { status: u16, body: String },

    /// The request never got a response.
    Failed { error: String },
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// Render the Markdown comment body.
///
/// The passed count is never computed; the placeholder is part of the
/// published format.
pub fn render_comment(failed_tests: &[String]) -> String {
    format!(
        "## 🔥 Test Failures Summary  \n\
         - **✅ Passed:** _(count not implemented)_  \n\
         - **❌ Failed:** {} tests  \n\
         - **📄 Detailed Failures:**  \n",
        failed_tests.len()
    )
}

/// Client for creating issue comments on pull requests.
pub struct PrCommenter {
    api_base_url: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl PrCommenter {
    /// Create a commenter against `api_base_url` with an optional token.
    pub fn new(api_base_url: &str, token: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("testgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CiError::HttpClient(e.to_string()))?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token,
            http_client,
        })
    }

    /// Issue-comments endpoint for a repository and PR.
    pub fn comments_url(&self, repo: &str, pr_number: &str) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_base_url, repo, pr_number
        )
    }

    /// Post a failure summary comment to a pull request.
    ///
    /// `_summary` is accepted for callers that have it but is not part of
    /// the rendered comment.
    pub async fn comment_on_pr(
        &self,
        repo: &str,
        pr_number: Option<&str>,
        failed_tests: &[String],
        _summary: &str,
    ) -> Result<CommentOutcome> {
        let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) else {
            info!("GITHUB_TOKEN not set. Skipping PR comment.");
            return Ok(CommentOutcome::SkippedNoToken);
        };
        let Some(pr_number) = pr_number.filter(|n| !n.is_empty()) else {
            info!("PR number could not be extracted. Skipping PR comment.");
            return Ok(CommentOutcome::SkippedNoPrNumber);
        };

        let url = self.comments_url(repo, pr_number);
        let body = render_comment(failed_tests);

        let response = self
            .http_client
            .post(&url)
            .header(AUTHORIZATION, format!("token {token}"))
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&CommentRequest { body: &body })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::CREATED {
            info!(repo, pr_number, "Successfully posted comment to PR.");
            return Ok(CommentOutcome::Posted);
        }

        let text = response.text().await.unwrap_or_default();
        error!(repo, pr_number, status = status.as_u16(), "Error posting comment: {text}");
        Ok(CommentOutcome::Rejected {
            status: status.as_u16(),
            body: text,
        })
    }
}
