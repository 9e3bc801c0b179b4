//! Testing utilities and mock implementations.
//!
//! Every external seam of the pipeline has a mock here, so the whole
//! request flow can run without network, ffmpeg or a storage bucket.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelmerge_core::testing::{MockCommandRunner, MockFetcher, MockObjectStore, MockWorkspaceManager};
//!
//! let fetcher = Arc::new(MockFetcher::new());
//! let runner = Arc::new(MockCommandRunner::new());
//! runner.fail_next(1).await; // force the re-encode fallback
//!
//! let pipeline = MergePipeline::new(fetcher, workspaces, runner, store);
//! ```

mod mock_command_runner;
mod mock_fetcher;
mod mock_object_store;
mod mock_workspace;

pub use mock_command_runner::{MockCommandRunner, MERGED_BYTES};
pub use mock_fetcher::{MockFetcher, DEFAULT_BODY};
pub use mock_object_store::{MockObjectStore, RecordedUpload};
pub use mock_workspace::MockWorkspaceManager;
