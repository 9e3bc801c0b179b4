use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub merger: MergerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Object storage configuration.
///
/// Any S3-compatible endpoint works. When `endpoint_url` is unset the
/// regular AWS endpoint resolution applies; when the key pair is unset the
/// default credential chain is used.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Destination bucket for merged outputs.
    #[serde(default)]
    pub bucket: String,
    /// Custom S3 API endpoint (e.g. "https://storage.googleapis.com").
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Signing region ("auto" works for GCS and R2).
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Use path-style addressing (`endpoint/bucket/key`).
    #[serde(default = "default_force_path_style")]
    pub force_path_style: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            endpoint_url: None,
            region: default_region(),
            access_key_id: None,
            secret_access_key: None,
            force_path_style: default_force_path_style(),
        }
    }
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_force_path_style() -> bool {
    true
}

/// Configuration for the ffmpeg invocations.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MergerConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// Ceiling for captured stdout and stderr, per stream, in bytes.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    /// Optional limit for a single ffmpeg run. No limit when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            max_output_bytes: default_max_output_bytes(),
            timeout_secs: None,
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_max_output_bytes() -> usize {
    50 * 1024 * 1024
}

/// Source download configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Optional limit for a whole download. No limit when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

fn default_user_agent() -> String {
    format!("reelmerge/{}", env!("CARGO_PKG_VERSION"))
}

/// Per-request scratch directory configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkspaceConfig {
    /// Directory under which request workspaces are created.
    #[serde(default = "default_workspace_root")]
    pub root: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
        }
    }
}

fn default_workspace_root() -> PathBuf {
    std::env::temp_dir()
}

/// Sanitized config for API responses and start-up logs (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: SanitizedStorageConfig,
    pub merger: MergerConfig,
    pub fetcher: FetcherConfig,
    pub workspace: WorkspaceConfig,
}

/// Storage config with the key pair hidden
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    pub region: String,
    pub credentials_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: SanitizedStorageConfig {
                bucket: config.storage.bucket.clone(),
                endpoint_url: config.storage.endpoint_url.clone(),
                region: config.storage.region.clone(),
                credentials_configured: config.storage.access_key_id.is_some()
                    && config.storage.secret_access_key.is_some(),
            },
            merger: config.merger.clone(),
            fetcher: config.fetcher.clone(),
            workspace: config.workspace.clone(),
        }
    }
}
