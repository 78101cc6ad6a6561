//! Reading `Config` from disk.
//!
//! The TOML file is the base layer. `WAVEPIPE_`-prefixed environment variables are
//! merged on top, with `__` separating the section from the key.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Loads the config file at `path` and applies environment overrides.
///
/// A missing file is [`ConfigError::FileNotFound`]; there is no fallback to defaults.
/// Environment keys use a double
/// underscore between section and field, e.g.
/// `WAVEPIPE_TRANSCODE__FFMPEG_PATH=/opt/ffmpeg/bin/ffmpeg`.
///
/// Only parsing happens here; run [`validate_config`](super::validate_config) on the
/// result before using it.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("WAVEPIPE_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Parses a TOML document without consulting the environment.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
