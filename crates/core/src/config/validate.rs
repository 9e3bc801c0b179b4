use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - ffmpeg output ceiling is not 0
/// - Timeouts, when set, are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.merger.max_output_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "merger.max_output_bytes cannot be 0".to_string(),
        ));
    }

    if config.merger.timeout_secs == Some(0) || config.fetcher.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "timeout_secs cannot be 0; leave it unset to disable the limit".to_string(),
        ));
    }

    Ok(())
}

/// Validate the settings only the merge service needs.
pub fn validate_storage_config(config: &Config) -> Result<(), ConfigError> {
    if config.storage.bucket.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.bucket must be set (OUTPUT_BUCKET)".to_string(),
        ));
    }

    if config.storage.access_key_id.is_some() != config.storage.secret_access_key.is_some() {
        return Err(ConfigError::ValidationError(
            "storage.access_key_id and storage.secret_access_key must be set together"
                .to_string(),
        ));
    }

    Ok(())
}
