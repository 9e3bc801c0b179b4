//! Request orchestration.
//!
//! [`MergePipeline`] sequences the components for one request:
//! validate, fetch every source in order, write the concat manifest, merge
//! (stream copy, then re-encode on failure), publish, and always clean up
//! the workspace before answering.

mod error;
mod request;
mod runner;

pub use error::{PipelineError, PipelineStage};
pub use request::{default_output_name, MergeRequest, ValidationError};
pub use runner::{MergeOutcome, MergePipeline};
