//! Pull request number resolution.

use crate::config::CiConfig;
use serde::{Deserialize, Serialize};

/// Where a comment would be posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrContext {
    /// `owner/name` repository slug.
    pub repo_slug: String,
    /// Resolved PR number, if any.
    pub pr_number: Option<String>,
}

impl PrContext {
    /// Resolve the repository and PR number from configuration.
    pub fn resolve(config: &CiConfig) -> Self {
        Self {
            repo_slug: config.repo_slug.clone(),
            pr_number: resolve_pr_number(config.github_ref.as_deref(), config.pr_id.as_deref()),
        }
    }
}

/// Derive a PR number from a git ref, falling back to a manual override.
///
/// A ref mentioning `pull` is split on `/` and its third segment is taken,
/// so `refs/pull/42/merge` yields `42`.
pub fn resolve_pr_number(github_ref: Option<&str>, pr_id: Option<&str>) -> Option<String> {
    if let Some(github_ref) = github_ref {
        if github_ref.contains("pull") {
            if let Some(segment) = github_ref.split('/').nth(2) {
                return Some(segment.to_string());
            }
        }
    }
    pr_id.map(str::to_string)
}
