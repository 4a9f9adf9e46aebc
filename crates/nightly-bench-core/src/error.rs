//! Error types for nightly-bench-core

use thiserror::Error;

/// Errors that can occur while planning pairs or dispatching workflows
#[derive(Error, Debug)]
pub enum BenchError {
    /// `git` could not be spawned or exited unsuccessfully
    #[error("git command failed: {0}")]
    GitCommand(String),

    /// The persisted plan file exists but is not a valid pair list
    #[error("malformed plan file {path}: {reason}")]
    MalformedPlan { path: String, reason: String },

    /// The trigger's results file is not a valid entry list
    #[error("malformed results file {path}: {reason}")]
    MalformedResults { path: String, reason: String },

    /// Transport-level HTTP failure (no response received)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for BenchError {
    fn from(err: reqwest::Error) -> Self {
        BenchError::Http(err.to_string())
    }
}

/// Result type for nightly-bench operations.
pub type Result<T> = std::result::Result<T, BenchError>;
