//! Concat demuxer manifest.
//!
//! The manifest lists the downloaded inputs, one `file '<path>'` line each,
//! in request order. ffmpeg reads it with `-f concat -safe 0`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A downloaded source and its position in the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInput {
    pub index: usize,
    pub path: PathBuf,
}

impl LocalInput {
    pub fn new(index: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            index,
            path: path.into(),
        }
    }
}

/// Errors that can occur while writing the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// There is nothing to concatenate.
    #[error("Manifest has no inputs")]
    Empty,

    /// An input file listed in the manifest does not exist.
    #[error("Input {index} not found: {path}")]
    MissingInput { index: usize, path: PathBuf },

    /// The manifest file could not be written.
    #[error("Failed to write manifest {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered list of inputs for the concat demuxer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatManifest {
    inputs: Vec<LocalInput>,
}

impl ConcatManifest {
    /// Builds a manifest ordered by input index.
    pub fn from_inputs(inputs: &[LocalInput]) -> Self {
        let mut inputs = inputs.to_vec();
        inputs.sort_by_key(|input| input.index);
        Self { inputs }
    }

    pub fn inputs(&self) -> &[LocalInput] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Renders the manifest text.
    pub fn render(&self) -> String {
        self.inputs
            .iter()
            .map(|input| format!("file '{}'", escape_path(&input.path)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes the manifest to `path` after checking every input exists.
    pub async fn write_to(&self, path: &Path) -> Result<PathBuf, ManifestError> {
        if self.inputs.is_empty() {
            return Err(ManifestError::Empty);
        }

        for input in &self.inputs {
            if !tokio::fs::try_exists(&input.path).await.unwrap_or(false) {
                return Err(ManifestError::MissingInput {
                    index: input.index,
                    path: input.path.clone(),
                });
            }
        }

        tokio::fs::write(path, self.render())
            .await
            .map_err(|source| ManifestError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(path.to_path_buf())
    }
}

/// Quotes a path for a single-quoted manifest entry.
///
/// The concat demuxer has no escape inside quotes, so an embedded `'`
/// closes the quote, emits an escaped quote and reopens it.
fn escape_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

/// Builds and writes the manifest for `inputs` to `manifest_path`.
pub async fn build_manifest(
    inputs: &[LocalInput],
    manifest_path: &Path,
) -> Result<PathBuf, ManifestError> {
    ConcatManifest::from_inputs(inputs)
        .write_to(manifest_path)
        .await
}
