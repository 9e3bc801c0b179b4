//! S3-compatible object store (AWS S3, GCS interoperability, R2, MinIO).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::{content_type_for, ObjectStore, PublishError};
use crate::config::StorageConfig;

/// Object store backed by the AWS S3 SDK.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Builds a client from configuration.
    ///
    /// Explicit keys win over the default AWS credential chain.
    pub async fn new(config: &StorageConfig) -> Result<Self, PublishError> {
        if config.bucket.trim().is_empty() {
            return Err(PublishError::Config("bucket is not set".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "reelmerge",
            ));
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self::with_client(
            Client::from_conf(s3_config),
            config.bucket.clone(),
        ))
    }

    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn name(&self) -> &str {
        "s3"
    }

    async fn upload(&self, local_path: &Path, object_name: &str) -> Result<(), PublishError> {
        debug!(
            "Uploading {} to {}/{}",
            local_path.display(),
            self.bucket,
            object_name
        );

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| PublishError::upload(object_name, e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object_name)
            .body(body)
            .content_type(content_type_for(object_name))
            .send()
            .await
            .map_err(|e| PublishError::upload(object_name, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    async fn signed_url(&self, object_name: &str, ttl: Duration) -> Result<String, PublishError> {
        let presign_config = PresigningConfig::expires_in(ttl)
            .map_err(|e| PublishError::signing(object_name, e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_name)
            .presigned(presign_config)
            .await
            .map_err(|e| {
                PublishError::signing(object_name, DisplayErrorContext(&e).to_string())
            })?;

        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config() -> StorageConfig {
        StorageConfig {
            bucket: "merged-videos".to_string(),
            endpoint_url: Some("https://storage.example.com".to_string()),
            region: "auto".to_string(),
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("wJalrXUtnFEMI".to_string()),
            force_path_style: true,
        }
    }

    #[tokio::test]
    async fn test_new_requires_bucket() {
        let mut config = storage_config();
        config.bucket = "  ".to_string();
        let result = S3ObjectStore::new(&config).await;
        assert!(matches!(result, Err(PublishError::Config(_))));
    }

    #[tokio::test]
    async fn test_signed_url_is_presigned_offline() {
        let store = S3ObjectStore::new(&storage_config()).await.unwrap();
        assert_eq!(store.bucket(), "merged-videos");

        let url = store
            .signed_url("merged-1.mp4", Duration::from_secs(3600))
            .await
            .unwrap();

        assert!(url.starts_with("https://storage.example.com/merged-videos/merged-1.mp4?"));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Signature="));
    }
}
