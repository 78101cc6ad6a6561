//! Static per-codec encoding profiles.

use super::types::Codec;

/// Quality label and the encoder arguments it expands to.
type QualityEntry = (&'static str, &'static [&'static str]);

/// How to invoke ffmpeg for one output codec.
#[derive(Debug)]
pub struct CodecProfile {
    pub codec: Codec,
    /// File extension of the encoded output.
    pub extension: &'static str,
    /// MIME type served alongside the encoded stream.
    pub mime_type: &'static str,
    /// ffmpeg muxer passed to `-f`.
    pub output_format: &'static str,
    qualities: &'static [QualityEntry],
}

// CBR bitrates plus the LAME VBR presets.
static MP3_PROFILE: CodecProfile = CodecProfile {
    codec: Codec::Mp3,
    extension: "mp3",
    mime_type: "audio/mpeg",
    output_format: "mp3",
    qualities: &[
        ("128", &["-b:a", "128k"]),
        ("192", &["-b:a", "192k"]),
        ("256", &["-b:a", "256k"]),
        ("320", &["-b:a", "320k"]),
        ("V0", &["-q:a", "0"]),
        ("V2", &["-q:a", "2"]),
        ("V4", &["-q:a", "4"]),
    ],
};

static OGG_PROFILE: CodecProfile = CodecProfile {
    codec: Codec::Ogg,
    extension: "ogg",
    mime_type: "audio/ogg",
    output_format: "ogg",
    qualities: &[
        ("low", &["-q:a", "3"]),
        ("standard", &["-q:a", "5"]),
        ("high", &["-q:a", "7"]),
        ("extreme", &["-q:a", "10"]),
    ],
};

static OPUS_PROFILE: CodecProfile = CodecProfile {
    codec: Codec::Opus,
    extension: "opus",
    mime_type: "audio/ogg; codecs=opus",
    output_format: "opus",
    qualities: &[
        ("64", &["-b:a", "64k"]),
        ("96", &["-b:a", "96k"]),
        ("128", &["-b:a", "128k"]),
        ("192", &["-b:a", "192k"]),
        ("256", &["-b:a", "256k"]),
    ],
};

impl CodecProfile {
    /// Returns the profile for a codec.
    pub fn for_codec(codec: Codec) -> &'static CodecProfile {
        match codec {
            Codec::Mp3 => &MP3_PROFILE,
            Codec::Ogg => &OGG_PROFILE,
            Codec::Opus => &OPUS_PROFILE,
        }
    }

    pub fn native_encoder(&self) -> &'static str {
        self.codec.native_encoder()
    }

    /// Encoder arguments for a quality label, or `None` if the label is unknown.
    pub fn quality_flags(&self, quality: &str) -> Option<&'static [&'static str]> {
        self.qualities
            .iter()
            .find(|(label, _)| *label == quality)
            .map(|(_, flags)| *flags)
    }

    /// Quality labels accepted by this profile, in preference order.
    pub fn qualities(&self) -> impl Iterator<Item = &'static str> {
        self.qualities.iter().map(|(label, _)| *label)
    }
}
