use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `REELMERGE_STORAGE__BUCKET`.
pub const ENV_PREFIX: &str = "REELMERGE_";

/// Load configuration from defaults, an optional TOML file and the environment.
///
/// Precedence, lowest first: built-in defaults, the file, `REELMERGE_*`
/// variables, then the platform variables `OUTPUT_BUCKET` and `PORT`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["CONFIG", "LOG_FORMAT"])
                .split("__"),
        )
        .merge(
            Env::raw()
                .only(&["OUTPUT_BUCKET"])
                .map(|_| "storage.bucket".into()),
        )
        .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
