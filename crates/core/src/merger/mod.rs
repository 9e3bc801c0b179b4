//! Merge executor.
//!
//! Concatenates the inputs listed in a concat manifest by shelling out to
//! ffmpeg. The external tool sits behind the [`CommandRunner`] trait so the
//! two-phase logic in [`ConcatMerger`] can run against a fake in tests.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use reelmerge_core::merger::{ConcatMerger, FfmpegRunner};
//!
//! let merger = ConcatMerger::new(Arc::new(FfmpegRunner::with_defaults()));
//! let artifact = merger.merge(&manifest_path, &output_path).await?;
//! println!("{} bytes via {}", artifact.size_bytes, artifact.strategy);
//! ```

mod concat;
mod error;
mod ffmpeg;
mod traits;

pub use concat::{ConcatMerger, MergeStrategy, MergedArtifact};
pub use error::{CommandError, MergeError};
pub use ffmpeg::FfmpegRunner;
pub use traits::{CommandOutput, CommandRunner};
