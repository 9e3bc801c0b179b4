//! Error types for the merger module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from a single invocation of the external tool.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The binary does not exist.
    #[error("FFmpeg not found at path: {path}")]
    NotFound { path: PathBuf },

    /// The process could not be started.
    #[error("Failed to spawn FFmpeg")]
    Spawn(#[source] std::io::Error),

    /// The process exited unsuccessfully.
    #[error("FFmpeg exited with code: {code:?}")]
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The process wrote more than the capture ceiling and was killed.
    #[error("FFmpeg output exceeded {limit} bytes")]
    OutputLimitExceeded { limit: usize },

    /// The process ran past the configured limit and was killed.
    #[error("FFmpeg timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while talking to the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Creates a failed-exit error from raw captured output.
    pub fn failed(code: Option<i32>, stdout: &[u8], stderr: &[u8]) -> Self {
        Self::Failed {
            code,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }

    /// Captured stderr, when the process ran to completion.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }
}

/// Errors from the two-phase concat merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Stream copy failed and the re-encode fallback failed too.
    #[error("Merge failed: stream copy ({primary}), re-encode ({fallback})")]
    BothFailed {
        #[source]
        primary: CommandError,
        fallback: CommandError,
    },

    /// The tool reported success but left no output file.
    #[error("Merge produced no output at {path}")]
    MissingOutput { path: PathBuf },
}
