//! Bridge error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::OutputFormat;

/// Errors that can occur while running ShellCheck or translating its output.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The tool output does not match the envelope expected for the format.
    #[error("Malformed {format} output: {source}")]
    MalformedEnvelope {
        format: OutputFormat,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The executable could not be started.
    #[error("Failed to run {}: {source}", executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool exited with a status that signals a failed run.
    #[error("ShellCheck exited with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },

    /// The reported tool version is not a semantic version.
    #[error("Invalid ShellCheck version: {0}")]
    InvalidVersion(#[from] semver::Error),

    /// The analysis could not be carried out by its host.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an analysis error.
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis(message.into())
    }

    /// Creates a malformed envelope error for the given format.
    pub fn malformed(format: OutputFormat, source: serde_json::Error) -> Self {
        Self::MalformedEnvelope { format, source }
    }

    /// Returns true if the error comes from unparsable tool output.
    pub fn is_malformed_envelope(&self) -> bool {
        matches!(self, Self::MalformedEnvelope { .. })
    }
}
