//! Workspaces backed by the local temporary directory.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::{Workspace, WorkspaceError, WorkspaceManager, WORKSPACE_PREFIX};
use crate::config::WorkspaceConfig;

/// Creates workspaces as `merge-XXXXXX` directories under a root.
#[derive(Debug, Clone)]
pub struct TempDirWorkspaces {
    root: PathBuf,
}

impl TempDirWorkspaces {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for TempDirWorkspaces {
    fn default() -> Self {
        Self::new(&WorkspaceConfig::default())
    }
}

#[async_trait]
impl WorkspaceManager for TempDirWorkspaces {
    async fn create(&self) -> Result<Workspace, WorkspaceError> {
        let root = self.root.clone();
        let dir = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&root)?;
            tempfile::Builder::new()
                .prefix(WORKSPACE_PREFIX)
                .tempdir_in(&root)
        })
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))
        .and_then(|r| r)
        .map_err(|source| WorkspaceError::CreateFailed {
            root: self.root.clone(),
            source,
        })?;

        debug!("Created workspace {}", dir.path().display());
        Ok(Workspace::from_temp_dir(dir))
    }

    async fn destroy(&self, workspace: Workspace) -> Result<(), WorkspaceError> {
        let path = workspace.path().to_path_buf();
        let Some(dir) = workspace.into_temp_dir() else {
            return Ok(());
        };

        tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))
            .and_then(|r| r)
            .map_err(|source| WorkspaceError::RemoveFailed {
                path: path.clone(),
                source,
            })?;

        debug!("Removed workspace {}", path.display());
        Ok(())
    }
}
