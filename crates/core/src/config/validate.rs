use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Probe timeout is not 0
/// - ffmpeg path is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.transcode.probe_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "transcode.probe_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.transcode.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "transcode.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
