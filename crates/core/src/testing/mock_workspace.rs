//! Mock workspace manager for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::RwLock;

use crate::workspace::{Workspace, WorkspaceError, WorkspaceManager, WORKSPACE_PREFIX};

/// Mock implementation of the WorkspaceManager trait.
///
/// Creates real directories under a private root so downloads and merges
/// can write files, and records every create and destroy.
#[derive(Debug)]
pub struct MockWorkspaceManager {
    root: TempDir,
    created: Arc<RwLock<Vec<PathBuf>>>,
    destroyed: Arc<RwLock<Vec<PathBuf>>>,
    fail_create: Arc<RwLock<bool>>,
    fail_destroy: Arc<RwLock<bool>>,
}

impl Default for MockWorkspaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWorkspaceManager {
    /// Create a new mock workspace manager.
    ///
    /// # Panics
    ///
    /// Panics if the private root directory cannot be created.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create mock workspace root"),
            created: Arc::new(RwLock::new(Vec::new())),
            destroyed: Arc::new(RwLock::new(Vec::new())),
            fail_create: Arc::new(RwLock::new(false)),
            fail_destroy: Arc::new(RwLock::new(false)),
        }
    }

    /// Make `create` fail.
    pub async fn set_fail_create(&self, fail: bool) {
        *self.fail_create.write().await = fail;
    }

    /// Make `destroy` fail, leaving the directory in place.
    pub async fn set_fail_destroy(&self, fail: bool) {
        *self.fail_destroy.write().await = fail;
    }

    pub async fn created_paths(&self) -> Vec<PathBuf> {
        self.created.read().await.clone()
    }

    pub async fn destroyed_paths(&self) -> Vec<PathBuf> {
        self.destroyed.read().await.clone()
    }

    /// Workspaces created but not destroyed.
    pub async fn live_count(&self) -> usize {
        let created = self.created.read().await;
        let destroyed = self.destroyed.read().await;
        created.iter().filter(|p| !destroyed.contains(p)).count()
    }
}

#[async_trait]
impl WorkspaceManager for MockWorkspaceManager {
    async fn create(&self) -> Result<Workspace, WorkspaceError> {
        if *self.fail_create.read().await {
            return Err(WorkspaceError::CreateFailed {
                root: self.root.path().to_path_buf(),
                source: std::io::Error::other("mock create failure"),
            });
        }

        let mut created = self.created.write().await;
        let path = self
            .root
            .path()
            .join(format!("{}{}", WORKSPACE_PREFIX, created.len()));
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| WorkspaceError::CreateFailed {
                root: self.root.path().to_path_buf(),
                source,
            })?;
        created.push(path.clone());

        Ok(Workspace::unmanaged(path))
    }

    async fn destroy(&self, workspace: Workspace) -> Result<(), WorkspaceError> {
        let path = workspace.path().to_path_buf();
        self.destroyed.write().await.push(path.clone());

        if *self.fail_destroy.read().await {
            return Err(WorkspaceError::RemoveFailed {
                path,
                source: std::io::Error::other("mock destroy failure"),
            });
        }

        tokio::fs::remove_dir_all(&path)
            .await
            .map_err(|source| WorkspaceError::RemoveFailed { path, source })
    }
}
