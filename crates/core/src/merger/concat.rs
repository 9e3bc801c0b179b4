//! Two-phase concat merge: stream copy first, re-encode as the fallback.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::error::{CommandError, MergeError};
use super::traits::CommandRunner;
use crate::metrics;

/// How the inputs are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Concat demuxer with `-c copy`; requires matching encodings.
    StreamCopy,
    /// Concat demuxer re-encoding to H.264 video and AAC audio.
    Reencode,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StreamCopy => "stream_copy",
            Self::Reencode => "reencode",
        }
    }

    /// Codec arguments placed between the input and the output path.
    fn codec_args(&self) -> &'static [&'static str] {
        match self {
            Self::StreamCopy => &["-c", "copy"],
            Self::Reencode => &["-c:v", "libx264", "-c:a", "aac"],
        }
    }

    /// Full ffmpeg argument list for this strategy.
    pub fn args(&self, manifest: &Path, output: &Path) -> Vec<String> {
        let mut args: Vec<String> = ["-y", "-f", "concat", "-safe", "0", "-i"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.push(manifest.to_string_lossy().into_owned());
        args.extend(self.codec_args().iter().map(|s| s.to_string()));
        args.push(output.to_string_lossy().into_owned());
        args
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single file produced by a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedArtifact {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub strategy: MergeStrategy,
}

/// Joins the inputs listed in a concat manifest.
#[derive(Clone)]
pub struct ConcatMerger {
    runner: Arc<dyn CommandRunner>,
}

impl ConcatMerger {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &Arc<dyn CommandRunner> {
        &self.runner
    }

    /// Merges the manifest into `output`.
    ///
    /// The re-encode attempt runs only if stream copy fails, and at most once.
    pub async fn merge(
        &self,
        manifest: &Path,
        output: &Path,
    ) -> Result<MergedArtifact, MergeError> {
        let primary = match self.attempt(MergeStrategy::StreamCopy, manifest, output).await {
            Ok(()) => return Self::artifact(MergeStrategy::StreamCopy, output).await,
            Err(e) => e,
        };

        warn!(
            error = %primary,
            stderr = primary.stderr().unwrap_or_default(),
            "Stream copy failed, falling back to re-encode"
        );

        match self.attempt(MergeStrategy::Reencode, manifest, output).await {
            Ok(()) => Self::artifact(MergeStrategy::Reencode, output).await,
            Err(fallback) => Err(MergeError::BothFailed { primary, fallback }),
        }
    }

    async fn attempt(
        &self,
        strategy: MergeStrategy,
        manifest: &Path,
        output: &Path,
    ) -> Result<(), CommandError> {
        let start = Instant::now();
        let result = self.runner.run(&strategy.args(manifest, output)).await;
        let outcome = if result.is_ok() { "success" } else { "failed" };

        metrics::MERGE_ATTEMPTS
            .with_label_values(&[strategy.as_str(), outcome])
            .inc();
        info!(
            strategy = %strategy,
            outcome,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Merge attempt finished"
        );

        result.map(|_| ())
    }

    async fn artifact(
        strategy: MergeStrategy,
        output: &Path,
    ) -> Result<MergedArtifact, MergeError> {
        let meta = tokio::fs::metadata(output)
            .await
            .map_err(|_| MergeError::MissingOutput {
                path: output.to_path_buf(),
            })?;

        Ok(MergedArtifact {
            path: output.to_path_buf(),
            size_bytes: meta.len(),
            strategy,
        })
    }
}
