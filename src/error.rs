//! Error types for building and running a scaffold pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before any step runs (validation, configuration)
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Failed to read config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single pipeline step
///
/// Every variant terminates the pipeline; the runner reports it on the
/// sink as one `Error: ...` line.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {command} (exit code {}): {stderr}", .code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Missing credential {name}")]
    CredentialMissing { name: String },

    #[error("No such directory: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl StepError {
    /// The message as a single line, suitable for the sink's error line
    pub fn single_line(&self) -> String {
        self.to_string()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
