//! Error types shared by every para crate

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for para operations
pub type Result<T> = std::result::Result<T, ParaError>;

/// Errors that can occur while submitting, polling or managing a batch
#[derive(Debug, Error)]
pub enum ParaError {
    /// An external executable exited non-zero or could not be started
    #[error("Command failed: `{command}` (exit code {code:?}): {stderr}")]
    ExternalCommand {
        /// The command line as it was invoked
        command: String,
        /// Exit code, `None` if the process never ran or was killed by a signal
        code: Option<i32>,
        /// Trimmed stderr of the process, or the spawn error text
        stderr: String,
    },

    /// Scheduler output did not have the expected shape
    #[error("Malformed {reply} reply from scheduler: {detail} (got {response:?})")]
    MalformedResponse {
        /// Which reply was being parsed (e.g. "submit", "status")
        reply: &'static str,
        /// What was wrong with it
        detail: String,
        /// The raw reply text
        response: String,
    },

    /// A captured-output file could not be read
    #[error("Cannot read the last line from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The batch directory is in the wrong state for the requested action
    #[error("{0}")]
    Precondition(String),

    /// Any other filesystem failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParaError {
    /// Create a malformed response error
    pub fn malformed(
        reply: &'static str,
        detail: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self::MalformedResponse {
            reply,
            detail: detail.into(),
            response: response.into(),
        }
    }

    /// Create an I/O error tagged with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from a failed external command
    pub fn is_external_command(&self) -> bool {
        matches!(self, Self::ExternalCommand { .. })
    }

    /// Stderr of a failed external command, if this is one
    pub fn command_stderr(&self) -> Option<&str> {
        match self {
            Self::ExternalCommand { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
