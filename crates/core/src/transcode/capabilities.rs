//! ffmpeg discovery and encoder capability detection.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

use super::config::TranscodeConfig;
use super::error::ProbeError;
use super::registry::Capabilities;
use super::types::{Codec, CodecSet};

/// Scans an `ffmpeg -codecs` listing for the encoders we use.
///
/// Each codec is checked on its own; a missing encoder only leaves that codec out.
pub fn detect_codecs(listing: &str) -> CodecSet {
    let mut codecs = CodecSet::empty();
    for codec in Codec::ALL {
        if listing.contains(codec.native_encoder()) {
            info!(
                "Found {}, enabling {} transcoding",
                codec.native_encoder(),
                codec
            );
            codecs.insert(codec);
        } else {
            warn!(
                "Could not find {}, disabling {} transcoding",
                codec.native_encoder(),
                codec
            );
        }
    }
    codecs
}

/// Resolves the configured ffmpeg binary against `PATH`.
pub async fn locate_ffmpeg(binary: &Path) -> Option<PathBuf> {
    let binary = binary.to_path_buf();
    tokio::task::spawn_blocking(move || which::which(binary).ok())
        .await
        .ok()
        .flatten()
}

/// Runs `ffmpeg -loglevel quiet -codecs` and returns its stdout.
async fn query_codecs(tool_path: &Path, limit: Duration) -> Result<String, ProbeError> {
    let child = Command::new(tool_path)
        .args(["-loglevel", "quiet", "-codecs"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ProbeError::Spawn {
            path: tool_path.to_path_buf(),
            source,
        })?;

    // Dropping the child on timeout kills it.
    let output = timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| ProbeError::Timeout {
            timeout_secs: limit.as_secs(),
        })?
        .map_err(ProbeError::Capture)?;

    if !output.status.success() {
        return Err(ProbeError::Exit(output.status));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Determines what this host can transcode to.
///
/// Never fails: a missing ffmpeg yields disabled capabilities, and a failed codec
/// listing yields ffmpeg with no usable encoders.
pub async fn probe(config: &TranscodeConfig) -> Capabilities {
    if !config.enabled {
        info!("Transcoding disabled in config");
        return Capabilities::disabled();
    }

    let Some(tool_path) = locate_ffmpeg(&config.ffmpeg_path).await else {
        warn!(
            "Cannot find {}, transcoding will be disabled",
            config.ffmpeg_path.display()
        );
        return Capabilities::disabled();
    };

    info!("Found ffmpeg: {}", tool_path.display());

    match query_codecs(&tool_path, config.probe_timeout()).await {
        Ok(listing) => {
            let codecs = detect_codecs(&listing);
            Capabilities::detected(tool_path, codecs)
        }
        Err(e) => {
            warn!(
                "Could not detect ffmpeg codecs, all codecs will be disabled: {}",
                e
            );
            Capabilities::detected(tool_path, CodecSet::empty())
        }
    }
}
