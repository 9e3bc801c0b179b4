//! Mock command runner for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::merger::{CommandError, CommandOutput, CommandRunner};

/// Bytes written as the merge output on success.
pub const MERGED_BYTES: &[u8] = b"mock-merged-output";

/// Mock implementation of the CommandRunner trait.
///
/// Records every argument list. Concat invocations that succeed write
/// [`MERGED_BYTES`] to their output path (the last argument) unless output
/// creation is switched off.
#[derive(Debug)]
pub struct MockCommandRunner {
    calls: Arc<RwLock<Vec<Vec<String>>>>,
    /// Number of upcoming runs that fail.
    failures_left: Arc<RwLock<usize>>,
    create_output: Arc<RwLock<bool>>,
    stdout: Arc<RwLock<String>>,
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(RwLock::new(Vec::new())),
            failures_left: Arc::new(RwLock::new(0)),
            create_output: Arc::new(RwLock::new(true)),
            stdout: Arc::new(RwLock::new("ffmpeg version mock".to_string())),
        }
    }

    /// Make the next `count` runs exit with a failure.
    pub async fn fail_next(&self, count: usize) {
        *self.failures_left.write().await = count;
    }

    /// Whether successful concat runs write an output file.
    pub async fn set_create_output(&self, create: bool) {
        *self.create_output.write().await = create;
    }

    /// Stdout returned by successful runs.
    pub async fn set_stdout(&self, stdout: &str) {
        *self.stdout.write().await = stdout.to_string();
    }

    pub async fn recorded_calls(&self) -> Vec<Vec<String>> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, args: &[String]) -> Result<CommandOutput, CommandError> {
        self.calls.write().await.push(args.to_vec());

        {
            let mut failures_left = self.failures_left.write().await;
            if *failures_left > 0 {
                *failures_left -= 1;
                return Err(CommandError::failed(
                    Some(1),
                    b"",
                    b"mock: Invalid data found when processing input",
                ));
            }
        }

        let is_concat = args.iter().any(|a| a == "concat");
        if is_concat && *self.create_output.read().await {
            if let Some(output) = args.last() {
                tokio::fs::write(output, MERGED_BYTES).await?;
            }
        }

        Ok(CommandOutput {
            stdout: self.stdout.read().await.clone(),
            stderr: String::new(),
        })
    }
}
