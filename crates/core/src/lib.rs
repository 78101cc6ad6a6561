pub mod config;
pub mod transcode;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LibraryConfig,
    ServerConfig,
};
pub use transcode::{
    Codec, CapabilityRegistry, CapabilitySnapshot, Song, TranscodeConfig, TranscodeError,
    TranscodeManager, TranscodeManagerHandle, TranscodeState, TranscodeStream, Transcoder,
    TranscoderFactory,
};
