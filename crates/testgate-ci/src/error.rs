//! Error types for testgate

use thiserror::Error;

/// Errors that can occur while running tests or reporting on them.
#[derive(Error, Debug)]
pub enum CiError {
    /// The configured test tool has no executable
    #[error("Test tool command is empty")]
    EmptyCommand,

    /// The test tool could not be started or waited on
    #[error("Failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The test tool did not finish in time
    #[error("'{tool}' timed out after {timeout_secs} seconds")]
    Timeout { tool: String, timeout_secs: u64 },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// The comment request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for CiError {
    fn from(err: reqwest::Error) -> Self {
        CiError::Http(err.to_string())
    }
}

/// Result alias for testgate operations.
pub type Result<T> = std::result::Result<T, CiError>;
