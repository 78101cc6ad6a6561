//! Configuration for the transcode module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the ffmpeg-backed transcoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeConfig {
    /// Set to false to keep transcoding off even when ffmpeg is installed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// ffmpeg binary name or path. Bare names are searched for in `PATH`.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Timeout for the startup codec listing in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// ffmpeg log level for transcode processes (quiet, panic, fatal, error, warning, ...).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Number of trailing stderr lines kept for failure reports.
    #[serde(default = "default_stderr_tail")]
    pub stderr_tail_lines: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "error".to_string()
}

fn default_stderr_tail() -> usize {
    20
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ffmpeg_path: default_ffmpeg_path(),
            probe_timeout_secs: default_probe_timeout(),
            ffmpeg_log_level: default_log_level(),
            stderr_tail_lines: default_stderr_tail(),
        }
    }
}

impl TranscodeConfig {
    /// Creates a config pointing at a specific ffmpeg binary.
    pub fn with_ffmpeg_path(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ..Default::default()
        }
    }

    /// Sets the probe timeout in seconds.
    pub fn with_probe_timeout(mut self, timeout_secs: u64) -> Self {
        self.probe_timeout_secs = timeout_secs;
        self
    }

    /// Turns transcoding off regardless of what is installed.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
