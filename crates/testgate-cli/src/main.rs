//! testgate - run a test suite and report failures to a pull request
//!
//! Runs pytest (or another compatible tool) against a path, prints the
//! failed tests with their assertion detail, and exits non-zero when any
//! test failed.
//!
//! ## Exit status
//!
//! - `0`: tests passed, or no tests were collected
//! - `1`: usage error, the tool could not be run, or tests failed
//!
//! Pull request details come from `GITHUB_REF`, `PR_ID`, `GITHUB_REPOSITORY`
//! and `GITHUB_TOKEN`. Comments are only posted with `--post-comments`.

use anyhow::{Context, Result};
use clap::builder::FalseyValueParser;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use testgate_ci::{
    init_tracing, CiConfig, CiPipeline, CommentOutcome, PipelineReport, PrContext, RunOutcome,
    TestTool,
};
use tracing::{debug, Level};

#[derive(Parser, Debug)]
#[command(name = "testgate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run tests and summarise failures for a pull request", long_about = None)]
struct Cli {
    /// File or directory to run the tests in
    test_path: PathBuf,

    /// Test tool command (words are split on whitespace)
    #[arg(long, env = "TESTGATE_TOOL", default_value = "pytest")]
    tool: String,

    /// Kill the test tool after this many seconds (0 = no limit)
    #[arg(long, default_value = "0")]
    timeout_secs: u64,

    /// Post a summary comment to the pull request when tests fail
    #[arg(
        long,
        env = "TESTGATE_POST_COMMENTS",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    post_comments: bool,

    /// Output format for the failure report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Build the run configuration: environment first, then flags.
    fn config(&self, base: CiConfig) -> CiConfig {
        let command = self.tool.split_whitespace().map(str::to_string).collect();
        base.with_tool(TestTool::custom(command).with_timeout(self.timeout_secs))
            .with_post_comments(self.post_comments)
    }
}

/// Machine-readable report for `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    status: &'static str,
    failed_tests: &'a [String],
    summary: &'a str,
    pr: Option<&'a PrContext>,
    comment: Option<String>,
}

impl<'a> JsonReport<'a> {
    fn from_report(report: &'a PipelineReport) -> Self {
        let (status, summary) = match &report.outcome {
            RunOutcome::NoTestsCollected => ("no_tests", ""),
            RunOutcome::Passed => ("passed", ""),
            RunOutcome::Failed(failures) => ("failed", failures.summary.as_str()),
        };
        Self {
            status,
            failed_tests: report.failed_tests(),
            summary,
            pr: report.pr.as_ref(),
            comment: report.comment.as_ref().map(describe_comment),
        }
    }
}

fn describe_comment(outcome: &CommentOutcome) -> String {
    match outcome {
        CommentOutcome::SkippedNoToken => "skipped: no token".to_string(),
        CommentOutcome::SkippedNoPrNumber => "skipped: no PR number".to_string(),
        CommentOutcome::Posted => "posted".to_string(),
        CommentOutcome::Rejected { status, .. } => format!("rejected: HTTP {status}"),
        CommentOutcome::Failed { error } => format!("failed: {error}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    match cmd_run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error running tests: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Run the tests and print the outcome.
async fn cmd_run(cli: &Cli) -> Result<ExitCode> {
    let config = cli.config(CiConfig::from_env());
    debug!(?config, "Resolved configuration");

    let report = CiPipeline::run(&config, &cli.test_path)
        .await
        .with_context(|| format!("could not run tests in {}", cli.test_path.display()))?;

    match cli.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&JsonReport::from_report(&report))?
        ),
    }

    Ok(ExitCode::from(exit_status(&report)))
}

fn print_text(report: &PipelineReport) {
    match &report.outcome {
        RunOutcome::NoTestsCollected => {
            println!("No tests were found. Exiting with status 0.");
        }
        RunOutcome::Passed => {}
        RunOutcome::Failed(failures) => {
            println!("Tests failed!");
            if !failures.is_empty() {
                println!("The following tests failed:");
                println!("{}", failures.summary);
            }
        }
    }
}

/// Process status for a finished run: 1 when any test failed.
fn exit_status(report: &PipelineReport) -> u8 {
    u8::from(report.has_failures())
}
