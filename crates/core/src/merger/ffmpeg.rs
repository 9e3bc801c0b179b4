//! FFmpeg process runner.

use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::error::CommandError;
use super::traits::{CommandOutput, CommandRunner};
use crate::config::MergerConfig;

/// Runs the configured ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    config: MergerConfig,
}

impl FfmpegRunner {
    /// Creates a new runner with the given configuration.
    pub fn new(config: MergerConfig) -> Self {
        Self { config }
    }

    /// Creates a runner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MergerConfig::default())
    }

    pub fn config(&self) -> &MergerConfig {
        &self.config
    }

    /// Reads both pipes up to the ceiling, then waits for exit.
    async fn collect(
        child: &mut Child,
        limit: usize,
    ) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), CommandError> {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (stdout, stderr) = tokio::try_join!(capture(stdout, limit), capture(stderr, limit))?;
        let status = child.wait().await?;

        Ok((status, stdout, stderr))
    }
}

/// Reads a pipe to EOF, failing once more than `limit` bytes arrive.
async fn capture<R>(pipe: Option<R>, limit: usize) -> Result<Vec<u8>, CommandError>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(Vec::new());
    };

    let mut buf = Vec::new();
    pipe.take(limit as u64 + 1).read_to_end(&mut buf).await?;
    if buf.len() > limit {
        return Err(CommandError::OutputLimitExceeded { limit });
    }
    Ok(buf)
}

#[async_trait]
impl CommandRunner for FfmpegRunner {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn run(&self, args: &[String]) -> Result<CommandOutput, CommandError> {
        debug!(
            "Running {} {}",
            self.config.ffmpeg_path.display(),
            args.join(" ")
        );

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CommandError::NotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    CommandError::Spawn(e)
                }
            })?;

        let limit = self.config.max_output_bytes;
        let result = match self.config.timeout_secs {
            Some(timeout_secs) => {
                match timeout(
                    Duration::from_secs(timeout_secs),
                    Self::collect(&mut child, limit),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(CommandError::Timeout { timeout_secs }),
                }
            }
            None => Self::collect(&mut child, limit).await,
        };

        let (status, stdout, stderr) = match result {
            Ok(collected) => collected,
            Err(e) => {
                let _ = child.kill().await;
                return Err(e);
            }
        };

        if !status.success() {
            return Err(CommandError::failed(status.code(), &stdout, &stderr));
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}
