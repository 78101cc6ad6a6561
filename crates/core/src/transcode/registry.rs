//! Write-once registry of transcoding capabilities.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::types::{Codec, CodecSet};

/// Settled outcome of a capability probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    tool_path: Option<PathBuf>,
    codecs: CodecSet,
}

impl Capabilities {
    /// ffmpeg was not found; nothing can be transcoded.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// ffmpeg was found at `tool_path` with the given encoders.
    pub fn detected(tool_path: impl Into<PathBuf>, codecs: CodecSet) -> Self {
        Self {
            tool_path: Some(tool_path.into()),
            codecs,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tool_path.is_some()
    }

    pub fn supports(&self, codec: Codec) -> bool {
        self.is_enabled() && self.codecs.contains(codec)
    }

    pub fn tool_path(&self) -> Option<&Path> {
        self.tool_path.as_deref()
    }

    pub fn codecs(&self) -> CodecSet {
        self.codecs
    }
}

/// Process-wide transcoding capabilities.
///
/// Starts out unsettled, which reads exactly like "disabled". The probe publishes a
/// [`Capabilities`] value once; after that the registry is read-only. Publishing is a
/// single atomic step, so a reader that sees the subsystem enabled also sees the tool path
/// and codec set that came with it.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    inner: OnceLock<Capabilities>,
}

impl CapabilityRegistry {
    /// Creates an unsettled registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that is already settled with `capabilities`.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        let registry = Self::new();
        registry.publish(capabilities);
        registry
    }

    /// Publishes probe results. Returns false if the registry was already settled.
    pub(crate) fn publish(&self, capabilities: Capabilities) -> bool {
        self.inner.set(capabilities).is_ok()
    }

    /// Whether the probe has finished.
    pub fn is_settled(&self) -> bool {
        self.inner.get().is_some()
    }

    /// Whether ffmpeg was found.
    pub fn is_enabled(&self) -> bool {
        self.inner.get().is_some_and(Capabilities::is_enabled)
    }

    /// Whether ffmpeg was found with the encoder for `codec`.
    pub fn supports(&self, codec: Codec) -> bool {
        self.inner.get().is_some_and(|c| c.supports(codec))
    }

    pub fn tool_path(&self) -> Option<&Path> {
        self.inner.get().and_then(Capabilities::tool_path)
    }

    /// Summary of the current state for status reporting.
    pub fn snapshot(&self) -> CapabilitySnapshot {
        let caps = self.inner.get();
        CapabilitySnapshot {
            settled: caps.is_some(),
            enabled: caps.is_some_and(Capabilities::is_enabled),
            ffmpeg_path: caps.and_then(|c| c.tool_path.clone()),
            codecs: caps.map(Capabilities::codecs).unwrap_or_default(),
        }
    }
}

/// Serializable view of the registry.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitySnapshot {
    pub settled: bool,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
    pub codecs: CodecSet,
}
