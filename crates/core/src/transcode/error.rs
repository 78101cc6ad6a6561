//! Error types for the transcode module.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

use super::types::{Codec, TranscodeState};

/// Errors returned by the transcoder factory and transcode operations.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// ffmpeg was not found (or transcoding was switched off).
    #[error("could not find ffmpeg, transcoding is disabled")]
    SubsystemDisabled,

    /// Requested codec is not one of MP3, OGG, OPUS.
    #[error("no such transcoder codec: {codec}")]
    InvalidCodec { codec: String },

    /// ffmpeg was found but lacks the encoder for this codec.
    #[error("{} codec not found, {codec} transcoding is disabled", encoder_name(.codec))]
    CodecDisabled { codec: Codec },

    /// Requested quality is not defined for the codec.
    #[error("invalid quality {quality:?} for {codec} transcoder")]
    InvalidQuality { codec: Codec, quality: String },

    /// The transcode process could not be started.
    #[error("failed to launch transcoder for {path}: {source}")]
    LaunchError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The transcode process ran but exited unsuccessfully.
    #[error("transcoder exited unsuccessfully ({status})")]
    ProcessFailure {
        status: ExitStatus,
        stderr: Option<String>,
    },

    /// Lifecycle call made in the wrong state (e.g., starting twice).
    #[error("cannot {operation} a transcode in {state} state")]
    InvalidState {
        operation: &'static str,
        state: TranscodeState,
    },

    /// I/O error while supervising the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn encoder_name(codec: &Codec) -> &'static str {
    codec.native_encoder()
}

impl TranscodeError {
    /// Creates a launch error for the given source path.
    pub fn launch(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LaunchError {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid state error.
    pub fn invalid_state(operation: &'static str, state: TranscodeState) -> Self {
        Self::InvalidState { operation, state }
    }

    /// Whether this error was caused by the caller's request rather than a server fault.
    ///
    /// Client errors map to 4xx responses and are not logged as faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::SubsystemDisabled
                | Self::InvalidCodec { .. }
                | Self::CodecDisabled { .. }
                | Self::InvalidQuality { .. }
        )
    }
}

/// Reasons the capability query can fail. Logged by the probe, never returned to callers.
#[derive(Debug, Error)]
pub(crate) enum ProbeError {
    #[error("failed to run {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read codec listing: {0}")]
    Capture(#[source] std::io::Error),

    #[error("codec listing exited unsuccessfully ({0})")]
    Exit(ExitStatus),

    #[error("codec listing timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}
