//! Run configuration.
//!
//! Everything the pipeline would otherwise read from the environment is
//! collected here once, so the components receive plain values.

use crate::tool::TestTool;
use std::fmt;

/// Environment variable holding the git ref of the triggering event.
pub const ENV_GITHUB_REF: &str = "GITHUB_REF";
/// Environment variable with a manually supplied PR number.
pub const ENV_PR_ID: &str = "PR_ID";
/// Environment variable holding the `owner/name` repository slug.
pub const ENV_GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
/// Environment variable holding the API token.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Environment variable overriding the GitHub API base URL.
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";

/// Repository slug used when none is configured.
pub const DEFAULT_REPO_SLUG: &str = "user/repo";
/// Public GitHub API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Configuration for a single testgate run.
#[derive(Clone, PartialEq, Eq)]
pub struct CiConfig {
    /// Test tool to invoke.
    pub tool: TestTool,
    /// `owner/name` repository slug.
    pub repo_slug: String,
    /// Git ref such as `refs/pull/42/merge`.
    pub github_ref: Option<String>,
    /// Manual PR number override.
    pub pr_id: Option<String>,
    /// API token for posting comments.
    pub token: Option<String>,
    /// GitHub API base URL, without a trailing slash.
    pub api_base_url: String,
    /// Whether failures are posted to the pull request.
    pub post_comments: bool,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            tool: TestTool::default(),
            repo_slug: DEFAULT_REPO_SLUG.to_string(),
            github_ref: None,
            pr_id: None,
            token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            post_comments: false,
        }
    }
}

impl fmt::Debug for CiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CiConfig")
            .field("tool", &self.tool)
            .field("repo_slug", &self.repo_slug)
            .field("github_ref", &self.github_ref)
            .field("pr_id", &self.pr_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("post_comments", &self.post_comments)
            .finish()
    }
}

impl CiConfig {
    /// Create a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a config from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            repo_slug: get(ENV_GITHUB_REPOSITORY).unwrap_or(defaults.repo_slug),
            github_ref: get(ENV_GITHUB_REF),
            pr_id: get(ENV_PR_ID),
            token: get(ENV_GITHUB_TOKEN),
            api_base_url: get(ENV_GITHUB_API_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            ..defaults
        }
    }

    /// Set the test tool.
    pub fn with_tool(mut self, tool: TestTool) -> Self {
        self.tool = tool;
        self
    }

    /// Set the repository slug.
    pub fn with_repo_slug(mut self, repo_slug: &str) -> Self {
        self.repo_slug = repo_slug.to_string();
        self
    }

    /// Set the API token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set the git ref.
    pub fn with_github_ref(mut self, github_ref: &str) -> Self {
        self.github_ref = Some(github_ref.to_string());
        self
    }

    /// Set the manual PR number.
    pub fn with_pr_id(mut self, pr_id: &str) -> Self {
        self.pr_id = Some(pr_id.to_string());
        self
    }

    /// Set the API base URL.
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable posting PR comments.
    pub fn with_post_comments(mut self, post_comments: bool) -> Self {
        self.post_comments = post_comments;
        self
    }
}
