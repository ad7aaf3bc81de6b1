//! Error taxonomy for the narration pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure the pipeline can hit. All of them are terminal.
#[derive(Debug, Error)]
pub enum NarrateError {
    #[error("Script file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Script file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("Failed to read script file {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to connect to Amazon Polly: {0}")]
    ConnectionFailure(String),

    /// `index` is 1-based to match the progress output.
    #[error("Synthesis failed for segment {index}/{total}: {reason}")]
    SynthesisFailure { index: usize, total: usize, reason: String },

    #[error("Failed to write audio to {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NarrateError {
    /// Remediation hints printed after the error itself.
    pub fn hints(&self) -> &'static [&'static str] {
        match self {
            NarrateError::MissingInput(_) => &["The script exists, or pass its location with --script (NARRATOR_SCRIPT)"],
            NarrateError::ConnectionFailure(_) => &[
                "AWS credentials are configured (aws configure, AWS_PROFILE or AWS_ACCESS_KEY_ID)",
                "A region is set (--region or AWS_REGION)",
                "Your AWS account has Amazon Polly access",
            ],
            _ => &[],
        }
    }
}
