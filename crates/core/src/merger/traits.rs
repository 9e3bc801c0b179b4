//! Trait definitions for the merger module.

use async_trait::async_trait;

use super::error::CommandError;

/// Output captured from a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs the external media tool with the given arguments.
///
/// The call returns once the process has exited. Only the exit status and
/// the captured output are inspected.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns the name of this runner implementation.
    fn name(&self) -> &str;

    /// Runs the tool and waits for it to exit.
    async fn run(&self, args: &[String]) -> Result<CommandOutput, CommandError>;
}
