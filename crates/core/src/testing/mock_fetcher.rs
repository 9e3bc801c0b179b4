//! Mock fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

use crate::fetcher::{FetchError, Fetcher};

/// Body written for URLs without a configured body.
pub const DEFAULT_BODY: &[u8] = b"mock-video-bytes";

/// Mock implementation of the Fetcher trait.
///
/// Every fetch is recorded in call order. URLs can be given a specific
/// body or a failing HTTP status.
#[derive(Debug, Default)]
pub struct MockFetcher {
    /// URLs fetched, in order.
    fetches: Arc<RwLock<Vec<Url>>>,
    /// Bodies by URL.
    bodies: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Failing statuses by URL.
    failures: Arc<RwLock<HashMap<String, u16>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub async fn set_body(&self, url: &str, body: impl Into<Vec<u8>>) {
        self.bodies
            .write()
            .await
            .insert(url.to_string(), body.into());
    }

    /// Answer `url` with a non-success `status`.
    pub async fn fail_url(&self, url: &str, status: u16) {
        self.failures.write().await.insert(url.to_string(), status);
    }

    /// URLs fetched so far, in call order.
    pub async fn recorded_fetches(&self) -> Vec<Url> {
        self.fetches.read().await.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        self.fetches.write().await.push(url.clone());

        if let Some(status) = self.failures.read().await.get(url.as_str()) {
            return Err(FetchError::Status {
                url: url.clone(),
                status: *status,
            });
        }

        let body = self
            .bodies
            .read()
            .await
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| DEFAULT_BODY.to_vec());

        tokio::fs::write(dest, &body)
            .await
            .map_err(|source| FetchError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        Ok(body.len() as u64)
    }
}
