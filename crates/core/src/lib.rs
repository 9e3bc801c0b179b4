pub mod config;
pub mod fetcher;
pub mod manifest;
pub mod merger;
pub mod metrics;
pub mod pipeline;
pub mod publisher;
pub mod testing;
pub mod workspace;

pub use config::{
    load_config, load_config_from_str, validate_config, validate_storage_config, Config,
    ConfigError, SanitizedConfig,
};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use manifest::{build_manifest, ConcatManifest, LocalInput, ManifestError};
pub use merger::{
    CommandError, CommandOutput, CommandRunner, ConcatMerger, FfmpegRunner, MergeError,
    MergeStrategy, MergedArtifact,
};
pub use pipeline::{
    MergeOutcome, MergePipeline, MergeRequest, PipelineError, PipelineStage, ValidationError,
};
pub use publisher::{
    AccessGrant, ObjectStore, PublishError, Publisher, S3ObjectStore, SIGNED_URL_TTL,
};
pub use workspace::{TempDirWorkspaces, Workspace, WorkspaceError, WorkspaceManager};
