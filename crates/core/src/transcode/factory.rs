//! Capability-gated construction of transcode operations.

use std::sync::Arc;

use super::config::TranscodeConfig;
use super::error::TranscodeError;
use super::operation::Transcoder;
use super::profile::CodecProfile;
use super::registry::CapabilityRegistry;
use super::types::Codec;

/// Turns a requested codec and quality into a ready-to-start [`Transcoder`].
#[derive(Debug, Clone)]
pub struct TranscoderFactory {
    registry: Arc<CapabilityRegistry>,
    config: Arc<TranscodeConfig>,
}

impl TranscoderFactory {
    pub fn new(registry: Arc<CapabilityRegistry>, config: Arc<TranscodeConfig>) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Validates the request and builds a transcoder in the `Created` state.
    ///
    /// Checks run in order: subsystem enabled, codec known, codec supported by this
    /// ffmpeg, quality known for the codec. A disabled codec is always reported before
    /// an invalid quality.
    pub fn create(&self, codec: &str, quality: &str) -> Result<Transcoder, TranscodeError> {
        let tool_path = self
            .registry
            .tool_path()
            .ok_or(TranscodeError::SubsystemDisabled)?;

        let codec = Codec::parse(codec).ok_or_else(|| TranscodeError::InvalidCodec {
            codec: codec.to_string(),
        })?;

        if !self.registry.supports(codec) {
            return Err(TranscodeError::CodecDisabled { codec });
        }

        let profile = CodecProfile::for_codec(codec);
        let flags = profile
            .quality_flags(quality)
            .ok_or_else(|| TranscodeError::InvalidQuality {
                codec,
                quality: quality.to_string(),
            })?;

        Ok(Transcoder::new(
            profile,
            quality.to_string(),
            flags,
            tool_path.to_path_buf(),
            self.config.ffmpeg_log_level.clone(),
            self.config.stderr_tail_lines,
        ))
    }
}
