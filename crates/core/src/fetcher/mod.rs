//! Source download.
//!
//! A [`Fetcher`] retrieves one remote resource and streams it to a local
//! path. The pipeline calls it once per source, strictly in order.

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Errors that can occur while downloading a source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("Failed to download {url}: {status}")]
    Status { url: Url, status: u16 },

    /// The request could not be completed.
    #[error("Request to {url} failed")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The body could not be written locally.
    #[error("Failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// The URL the error refers to, if any.
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Status { url, .. } | Self::Request { url, .. } => Some(url),
            Self::Io { .. } | Self::Client(_) => None,
        }
    }
}

/// Retrieves a remote resource into a local file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Downloads `url` into `dest`, overwriting it, and returns the byte count.
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError>;
}
