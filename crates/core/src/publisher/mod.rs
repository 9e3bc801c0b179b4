//! Publisher: uploads the merged artifact and issues a signed read URL.

mod s3;

pub use s3::S3ObjectStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Lifetime of every signed URL, counted from issuance.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors from the durable store.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The artifact could not be uploaded.
    #[error("Upload of {object_name} failed: {message}")]
    Upload {
        object_name: String,
        message: String,
    },

    /// The signed URL could not be created.
    #[error("Signing URL for {object_name} failed: {message}")]
    Signing {
        object_name: String,
        message: String,
    },

    /// The store client could not be configured.
    #[error("Object store configuration error: {0}")]
    Config(String),
}

impl PublishError {
    pub fn upload(object_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upload {
            object_name: object_name.into(),
            message: message.into(),
        }
    }

    pub fn signing(object_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Signing {
            object_name: object_name.into(),
            message: message.into(),
        }
    }
}

/// Temporary read access to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGrant {
    pub url: String,
    pub object_name: String,
    pub expires_at: DateTime<Utc>,
}

/// A durable object store that can mint time-limited read URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Uploads a local file under `object_name`, replacing any existing object.
    async fn upload(&self, local_path: &Path, object_name: &str) -> Result<(), PublishError>;

    /// Creates a signed GET URL for `object_name` valid for `ttl`.
    async fn signed_url(&self, object_name: &str, ttl: Duration) -> Result<String, PublishError>;
}

/// Uploads artifacts and hands out access grants.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Uploads `local_path` as `object_name` and signs a read URL for it.
    pub async fn publish(
        &self,
        local_path: &Path,
        object_name: &str,
    ) -> Result<AccessGrant, PublishError> {
        self.store.upload(local_path, object_name).await?;
        info!(object_name, store = self.store.name(), "Uploaded artifact");

        let issued_at = Utc::now();
        let url = self.store.signed_url(object_name, SIGNED_URL_TTL).await?;
        let ttl = chrono::Duration::from_std(SIGNED_URL_TTL)
            .map_err(|e| PublishError::signing(object_name, e.to_string()))?;

        Ok(AccessGrant {
            url,
            object_name: object_name.to_string(),
            expires_at: issued_at + ttl,
        })
    }
}

/// Content type sent with the upload, guessed from the extension.
pub fn content_type_for(object_name: &str) -> &'static str {
    let extension = Path::new(object_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        Some("webm") => "video/webm",
        Some("ts") => "video/mp2t",
        _ => "application/octet-stream",
    }
}
