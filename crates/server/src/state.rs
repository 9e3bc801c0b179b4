use reelmerge_core::{CommandRunner, Config, MergePipeline, SanitizedConfig};
use std::sync::Arc;

/// Shared state of the merge service
pub struct AppState {
    config: Config,
    pipeline: Arc<MergePipeline>,
}

impl AppState {
    pub fn new(config: Config, pipeline: Arc<MergePipeline>) -> Self {
        Self { config, pipeline }
    }

    pub fn pipeline(&self) -> &MergePipeline {
        &self.pipeline
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}

/// Shared state of the probe service
pub struct ProbeState {
    runner: Arc<dyn CommandRunner>,
}

impl ProbeState {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }
}
