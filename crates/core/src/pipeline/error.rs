//! Pipeline stages and the request-level error.

use std::fmt;
use thiserror::Error;

use super::request::ValidationError;
use crate::fetcher::FetchError;
use crate::manifest::ManifestError;
use crate::merger::MergeError;
use crate::publisher::PublishError;
use crate::workspace::WorkspaceError;

/// Stages a merge request moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Validating,
    Fetching,
    Planning,
    Merging,
    Publishing,
    CleaningUp,
    Responding,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Planning => "planning",
            Self::Merging => "merging",
            Self::Publishing => "publishing",
            Self::CleaningUp => "cleaning_up",
            Self::Responding => "responding",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a merge request failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Workspace unavailable: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Download failed: {0}")]
    Download(#[from] FetchError),

    #[error("Manifest write failed: {0}")]
    ManifestWrite(#[from] ManifestError),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("Upload failed: {0}")]
    Upload(#[source] PublishError),

    #[error("Signing failed: {0}")]
    Signing(#[source] PublishError),
}

impl From<PublishError> for PipelineError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Signing { .. } => Self::Signing(err),
            PublishError::Upload { .. } | PublishError::Config(_) => Self::Upload(err),
        }
    }
}

impl PipelineError {
    /// The stage that was running when the error happened.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Validation(_) => PipelineStage::Validating,
            Self::Workspace(_) | Self::Download(_) => PipelineStage::Fetching,
            Self::ManifestWrite(_) => PipelineStage::Planning,
            Self::Merge(_) => PipelineStage::Merging,
            Self::Upload(_) | Self::Signing(_) => PipelineStage::Publishing,
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
