//! Mock object store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::publisher::{ObjectStore, PublishError};

/// A recorded upload for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub local_path: PathBuf,
    pub object_name: String,
    pub size_bytes: u64,
}

/// Mock implementation of the ObjectStore trait.
///
/// Keeps uploaded bytes in memory and mints fake signed URLs of the form
/// `https://storage.mock/<bucket>/<object>?expires=<secs>&signature=mock`.
#[derive(Debug)]
pub struct MockObjectStore {
    bucket: String,
    uploads: Arc<RwLock<Vec<RecordedUpload>>>,
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    signed_ttls: Arc<RwLock<Vec<Duration>>>,
    fail_upload: Arc<RwLock<bool>>,
    fail_signing: Arc<RwLock<bool>>,
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::with_bucket("mock-bucket")
    }

    pub fn with_bucket(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            uploads: Arc::new(RwLock::new(Vec::new())),
            objects: Arc::new(RwLock::new(HashMap::new())),
            signed_ttls: Arc::new(RwLock::new(Vec::new())),
            fail_upload: Arc::new(RwLock::new(false)),
            fail_signing: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn set_fail_upload(&self, fail: bool) {
        *self.fail_upload.write().await = fail;
    }

    pub async fn set_fail_signing(&self, fail: bool) {
        *self.fail_signing.write().await = fail;
    }

    pub async fn recorded_uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.read().await.clone()
    }

    /// Stored bytes of an object.
    pub async fn object(&self, object_name: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(object_name).cloned()
    }

    /// TTLs requested for signed URLs, in call order.
    pub async fn signed_ttls(&self) -> Vec<Duration> {
        self.signed_ttls.read().await.clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(&self, local_path: &Path, object_name: &str) -> Result<(), PublishError> {
        if *self.fail_upload.read().await {
            return Err(PublishError::upload(object_name, "mock upload failure"));
        }

        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| PublishError::upload(object_name, e.to_string()))?;

        self.uploads.write().await.push(RecordedUpload {
            local_path: local_path.to_path_buf(),
            object_name: object_name.to_string(),
            size_bytes: bytes.len() as u64,
        });
        self.objects
            .write()
            .await
            .insert(object_name.to_string(), bytes);
        Ok(())
    }

    async fn signed_url(&self, object_name: &str, ttl: Duration) -> Result<String, PublishError> {
        self.signed_ttls.write().await.push(ttl);

        if *self.fail_signing.read().await {
            return Err(PublishError::signing(object_name, "mock signing failure"));
        }

        Ok(format!(
            "https://storage.mock/{}/{}?expires={}&signature=mock",
            self.bucket,
            object_name,
            ttl.as_secs()
        ))
    }
}
