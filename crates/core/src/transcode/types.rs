//! Types for the transcode module.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Output codec a song can be transcoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Codec {
    /// MPEG Audio Layer III
    Mp3,
    /// Ogg Vorbis
    Ogg,
    /// Ogg Opus
    Opus,
}

impl Codec {
    /// Every codec the transcoder knows about.
    pub const ALL: [Codec; 3] = [Codec::Mp3, Codec::Ogg, Codec::Opus];

    /// Parse a codec identifier. Identifiers are matched exactly: `MP3`, `OGG`, `OPUS`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MP3" => Some(Self::Mp3),
            "OGG" => Some(Self::Ogg),
            "OPUS" => Some(Self::Opus),
            _ => None,
        }
    }

    /// Returns the external identifier for this codec.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "MP3",
            Self::Ogg => "OGG",
            Self::Opus => "OPUS",
        }
    }

    /// Returns the ffmpeg encoder library used for this codec.
    ///
    /// This is also the name searched for in the `ffmpeg -codecs` listing.
    pub fn native_encoder(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Ogg => "libvorbis",
            Self::Opus => "libopus",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of codecs, one bit per [`Codec`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecSet(u8);

impl CodecSet {
    /// An empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds a codec to the set.
    pub fn insert(&mut self, codec: Codec) {
        self.0 |= codec.bit();
    }

    /// Whether the codec is in the set.
    pub fn contains(&self, codec: Codec) -> bool {
        self.0 & codec.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the codecs in the set, in [`Codec::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = Codec> + '_ {
        Codec::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl FromIterator<Codec> for CodecSet {
    fn from_iter<I: IntoIterator<Item = Codec>>(iter: I) -> Self {
        let mut set = Self::empty();
        for codec in iter {
            set.insert(codec);
        }
        set
    }
}

impl Serialize for CodecSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Lifecycle state of a transcode operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscodeState {
    /// Built by the factory, process not spawned yet.
    Created,
    /// Process spawned, output stream handed out.
    Running,
    /// Process exited successfully.
    Completed,
    /// Process could not be launched, exited with an error, or was aborted.
    Failed,
}

impl fmt::Display for TranscodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A song as stored by the library: where its file lives and what it claims to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Source file path.
    pub path: PathBuf,
    /// Declared file type (e.g., "flac", "mp3").
    pub file_type: String,
}

impl Song {
    /// Creates a song descriptor, taking the file type from the path's extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_type = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Self { path, file_type }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
