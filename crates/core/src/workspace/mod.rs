//! Per-request scratch directories.
//!
//! Every merge request works inside its own [`Workspace`]. The directory is
//! removed when the request ends, through [`WorkspaceManager::destroy`] on the
//! normal path or through `Drop` when the request future is abandoned.

mod tempdir;

pub use tempdir::TempDirWorkspaces;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

/// Prefix of every workspace directory name.
pub const WORKSPACE_PREFIX: &str = "merge-";

/// Errors raised while creating or removing a workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The workspace directory could not be created.
    #[error("Failed to create workspace under {root}")]
    CreateFailed {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workspace directory could not be removed.
    #[error("Failed to remove workspace {path}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An isolated directory owning every file of one request.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl Workspace {
    /// Wraps a directory that is removed on drop.
    pub fn from_temp_dir(dir: TempDir) -> Self {
        Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        }
    }

    /// Wraps a directory whose lifetime is managed elsewhere.
    pub fn unmanaged(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dir: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Path where the source at `index` is downloaded.
    pub fn input_path(&self, index: usize) -> PathBuf {
        self.file(&format!("input-{}.mp4", index))
    }

    /// Path of the concat manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.file("list.txt")
    }

    /// Local path of the merged file.
    ///
    /// Keeps the extension of `output_name` so ffmpeg picks the same
    /// container, but never shares a name with an input or the manifest.
    pub fn output_path(&self, output_name: &str) -> PathBuf {
        let extension = Path::new(output_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .unwrap_or("mp4");
        self.file(&format!("output.{}", extension))
    }

    /// Releases the drop guard, handing back the directory handle if any.
    pub fn into_temp_dir(mut self) -> Option<TempDir> {
        self.dir.take()
    }
}

/// Allocates and releases workspaces.
#[async_trait]
pub trait WorkspaceManager: Send + Sync {
    /// Creates a fresh, uniquely named workspace.
    async fn create(&self) -> Result<Workspace, WorkspaceError>;

    /// Removes a workspace and everything in it.
    async fn destroy(&self, workspace: Workspace) -> Result<(), WorkspaceError>;
}
