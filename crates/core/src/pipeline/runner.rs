//! Merge pipeline: fetch, plan, merge, publish, clean up.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

use super::error::{PipelineError, PipelineStage};
use super::request::MergeRequest;
use crate::fetcher::Fetcher;
use crate::manifest::{build_manifest, LocalInput};
use crate::merger::{CommandRunner, ConcatMerger, MergeStrategy};
use crate::metrics;
use crate::publisher::{ObjectStore, Publisher};
use crate::workspace::{Workspace, WorkspaceManager};

/// Result of a successful merge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub url: String,
    pub output_name: String,
    pub expires_at: DateTime<Utc>,
    pub strategy: MergeStrategy,
}

/// Runs merge requests end to end.
///
/// Holds only shared, immutable collaborators, so one instance serves any
/// number of concurrent requests. Each request gets its own workspace.
#[derive(Clone)]
pub struct MergePipeline {
    fetcher: Arc<dyn Fetcher>,
    workspaces: Arc<dyn WorkspaceManager>,
    merger: ConcatMerger,
    publisher: Publisher,
}

impl MergePipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        workspaces: Arc<dyn WorkspaceManager>,
        runner: Arc<dyn CommandRunner>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            fetcher,
            workspaces,
            merger: ConcatMerger::new(runner),
            publisher: Publisher::new(store),
        }
    }

    /// Validates raw request fields and runs the request.
    ///
    /// Invalid input is rejected before a workspace is allocated.
    pub async fn handle(
        &self,
        sources: Vec<String>,
        output_name: Option<String>,
    ) -> Result<MergeOutcome, PipelineError> {
        let request = MergeRequest::new(sources, output_name).inspect_err(|e| {
            metrics::MERGE_REQUESTS.with_label_values(&["rejected"]).inc();
            info!(error = %e, "Rejected merge request");
        })?;
        self.run(request).await
    }

    /// Runs a validated request.
    ///
    /// The workspace is destroyed exactly once whatever the outcome; a
    /// cleanup failure is logged and never replaces the result.
    pub async fn run(&self, request: MergeRequest) -> Result<MergeOutcome, PipelineError> {
        let span = info_span!(
            "merge",
            output_name = %request.output_name(),
            sources = request.sources().len()
        );

        async move {
            let start = Instant::now();
            info!("Merge request accepted");

            let result = match self.workspaces.create().await {
                Ok(workspace) => {
                    let result = self.execute(&request, &workspace).await;
                    self.cleanup(workspace).await;
                    result
                }
                Err(e) => Err(e.into()),
            };

            match &result {
                Ok(outcome) => {
                    metrics::MERGE_REQUESTS.with_label_values(&["success"]).inc();
                    info!(
                        strategy = %outcome.strategy,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Merge request completed"
                    );
                }
                Err(e) => {
                    let stage = e.stage();
                    metrics::MERGE_REQUESTS.with_label_values(&["failed"]).inc();
                    metrics::MERGE_FAILURES
                        .with_label_values(&[stage.as_str()])
                        .inc();
                    error!(stage = %stage, error = %e, detail = ?e, "Merge request failed");
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        request: &MergeRequest,
        workspace: &Workspace,
    ) -> Result<MergeOutcome, PipelineError> {
        let inputs = timed(PipelineStage::Fetching, self.fetch_all(request, workspace)).await?;

        let manifest = timed(
            PipelineStage::Planning,
            build_manifest(&inputs, &workspace.manifest_path()),
        )
        .await?;

        let output = workspace.output_path(request.output_name());
        let artifact = timed(PipelineStage::Merging, self.merger.merge(&manifest, &output)).await?;
        info!(
            strategy = %artifact.strategy,
            size_bytes = artifact.size_bytes,
            "Merged inputs"
        );

        let grant = timed(
            PipelineStage::Publishing,
            self.publisher.publish(&artifact.path, request.output_name()),
        )
        .await?;

        Ok(MergeOutcome {
            url: grant.url,
            output_name: grant.object_name,
            expires_at: grant.expires_at,
            strategy: artifact.strategy,
        })
    }

    /// Downloads every source in order; the first failure stops the loop.
    async fn fetch_all(
        &self,
        request: &MergeRequest,
        workspace: &Workspace,
    ) -> Result<Vec<LocalInput>, PipelineError> {
        let mut inputs = Vec::with_capacity(request.sources().len());

        for (index, url) in request.sources().iter().enumerate() {
            let dest = workspace.input_path(index);
            let bytes = self.fetcher.fetch(url, &dest).await?;
            info!(index, %url, bytes, "Downloaded source");
            inputs.push(LocalInput::new(index, dest));
        }

        Ok(inputs)
    }

    async fn cleanup(&self, workspace: Workspace) {
        let path = workspace.path().to_path_buf();
        let start = Instant::now();
        if let Err(e) = self.workspaces.destroy(workspace).await {
            warn!(workspace = %path.display(), error = %e, "Workspace cleanup failed");
        }
        observe(PipelineStage::CleaningUp, start);
    }
}

async fn timed<T, E, F>(stage: PipelineStage, fut: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, E>>,
    PipelineError: From<E>,
{
    let start = Instant::now();
    let result = fut.await.map_err(PipelineError::from);
    observe(stage, start);
    result
}

fn observe(stage: PipelineStage, start: Instant) {
    metrics::STAGE_DURATION
        .with_label_values(&[stage.as_str()])
        .observe(start.elapsed().as_secs_f64());
}
