//! testgate CI - test failure reporting for pull requests
//!
//! Runs a test tool (pytest by default) against a path and:
//! - Classifies the run by exit code (no tests / passed / failed)
//! - Extracts `FAILED ` lines and their assertion detail into a summary
//! - Resolves the pull request the run belongs to
//! - Optionally posts a summary comment to that pull request

pub mod comment;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod pr;
pub mod runner;
pub mod telemetry;
pub mod tool;

// Re-export key types
pub use comment::{render_comment, CommentOutcome, PrCommenter};
pub use config::CiConfig;
pub use error::{CiError, Result};
pub use extract::{extract_failures, FailureReport};
pub use pipeline::{CiPipeline, PipelineReport};
pub use pr::{resolve_pr_number, PrContext};
pub use runner::{RunOutcome, RunResult, TestRunner};
pub use telemetry::init_tracing;
pub use tool::TestTool;
