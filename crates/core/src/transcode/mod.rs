//! On-the-fly audio transcoding through ffmpeg.
//!
//! At startup the [`TranscodeManager`] probes the host for ffmpeg and for the encoders
//! behind each output codec (`libmp3lame`, `libvorbis`, `libopus`), then publishes the
//! result into a write-once [`CapabilityRegistry`]. Request handlers use a
//! [`TranscoderFactory`] to turn a codec and quality label into a [`Transcoder`], which
//! runs one ffmpeg process and exposes its stdout as a [`TranscodeStream`].
//!
//! # Example
//!
//! ```ignore
//! use tokio::io::AsyncReadExt;
//! use wavepipe_core::transcode::{Song, TranscodeConfig, TranscodeManager};
//!
//! let manager = TranscodeManager::new(TranscodeConfig::default());
//! manager.probe_now().await;
//!
//! let mut transcoder = manager.factory().create("MP3", "320")?;
//! let mut stream = transcoder.start(&Song::from_path("/music/song.flac")).await?;
//!
//! let mut encoded = Vec::new();
//! stream.read_to_end(&mut encoded).await?;
//! transcoder.wait().await?;
//! ```

mod capabilities;
mod config;
mod error;
mod factory;
mod manager;
mod operation;
mod profile;
mod registry;
mod types;

pub use capabilities::{detect_codecs, locate_ffmpeg, probe};
pub use config::TranscodeConfig;
pub use error::TranscodeError;
pub use factory::TranscoderFactory;
pub use manager::{TranscodeManager, TranscodeManagerHandle};
pub use operation::{TranscodeStream, Transcoder};
pub use profile::CodecProfile;
pub use registry::{Capabilities, CapabilityRegistry, CapabilitySnapshot};
pub use types::{Codec, CodecSet, Song, TranscodeState};
