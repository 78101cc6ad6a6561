//! Common test utilities for API testing.
//!
//! Provides an in-process router over a temporary music library, with the transcode
//! registry settled up front so tests never wait on a background probe.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use wavepipe_core::transcode::{Capabilities, CapabilityRegistry, Codec, CodecSet};
use wavepipe_core::{Config, LibraryConfig, TranscodeConfig, TranscoderFactory};
use wavepipe_server::{api::create_router, state::AppState};

/// Fake ffmpeg: lists every encoder and "transcodes" by copying the input to stdout.
const FAKE_FFMPEG: &str = r#"#!/bin/sh
for arg in "$@"; do
    if [ "$arg" = "-codecs" ]; then
        echo " DEA.L. mp3 MP3 (encoders: libmp3lame )"
        echo " DEA.L. vorbis Vorbis (encoders: libvorbis )"
        echo " DEA.L. opus Opus (encoders: libopus )"
        exit 0
    fi
done
input=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "-i" ]; then input="$arg"; fi
    prev="$arg"
done
exec cat "$input"
"#;

struct FakeFfmpeg {
    _dir: TempDir,
    path: PathBuf,
}

/// Written once, before any test spawns it.
static FAKE_FFMPEG_BIN: LazyLock<FakeFfmpeg> = LazyLock::new(|| {
    let dir = TempDir::new().expect("Failed to create tools dir");
    let path = dir.path().join("ffmpeg");
    std::fs::write(&path, FAKE_FFMPEG).expect("Failed to write fake ffmpeg");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake ffmpeg");
    }

    FakeFfmpeg { _dir: dir, path }
});

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }
}

/// Test fixture wrapping a router and its music library.
pub struct TestFixture {
    pub router: Router,
    pub library: TempDir,
}

impl TestFixture {
    /// Fixture where ffmpeg was not found.
    pub fn without_ffmpeg() -> Self {
        Self::with_capabilities(Capabilities::disabled())
    }

    /// Fixture backed by the fake ffmpeg with the given encoders.
    pub fn with_codecs(codecs: &[Codec]) -> Self {
        let codecs: CodecSet = codecs.iter().copied().collect();
        Self::with_capabilities(Capabilities::detected(&FAKE_FFMPEG_BIN.path, codecs))
    }

    fn with_capabilities(capabilities: Capabilities) -> Self {
        let library = TempDir::new().expect("Failed to create library dir");
        let config = Config {
            library: LibraryConfig {
                root: library.path().to_path_buf(),
            },
            ..Default::default()
        };

        let registry = Arc::new(CapabilityRegistry::with_capabilities(capabilities));
        let factory = TranscoderFactory::new(registry, Arc::new(TranscodeConfig::default()));
        let state = Arc::new(AppState::new(config, factory));

        Self {
            router: create_router(state),
            library,
        }
    }

    /// Adds a file to the library and returns its library-relative path.
    pub fn add_song(&self, relative: &str, contents: &[u8]) -> String {
        let path = self.library.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create song dir");
        }
        std::fs::write(&path, contents).expect("Failed to write song");
        relative.to_string()
    }

    /// Send a GET request to the router.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            content_type,
            bytes,
        }
    }
}
