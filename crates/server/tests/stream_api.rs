//! Streaming and transcode status API tests.

mod common;

use axum::http::StatusCode;
use common::TestFixture;
use wavepipe_core::Codec;

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::without_ffmpeg();
    let response = fixture.get("/api/v0/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

#[tokio::test]
async fn test_transcode_status_disabled() {
    let fixture = TestFixture::without_ffmpeg();
    let response = fixture.get("/api/v0/transcode").await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["capabilities"]["settled"], true);
    assert_eq!(json["capabilities"]["enabled"], false);
    assert_eq!(json["capabilities"]["codecs"], serde_json::json!([]));
    assert_eq!(json["profiles"].as_array().unwrap().len(), 3);
    assert_eq!(json["profiles"][0]["available"], false);
}

#[tokio::test]
async fn test_transcode_status_lists_available_codecs() {
    let fixture = TestFixture::with_codecs(&[Codec::Mp3]);
    let json = fixture.get("/api/v0/transcode").await.json();

    assert_eq!(json["capabilities"]["enabled"], true);
    assert_eq!(json["capabilities"]["codecs"], serde_json::json!(["MP3"]));
    assert_eq!(json["profiles"][0]["codec"], "MP3");
    assert_eq!(json["profiles"][0]["available"], true);
    assert_eq!(json["profiles"][1]["codec"], "OGG");
    assert_eq!(json["profiles"][1]["available"], false);
    assert!(json["profiles"][0]["qualities"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("320")));
}

#[tokio::test]
async fn test_stream_original_file() {
    let fixture = TestFixture::without_ffmpeg();
    let song = fixture.add_song("Artist/Album/01 - Intro.flac", b"fLaC original bytes");

    let response = fixture
        .get(&format!("/api/v0/stream/{}", song.replace(' ', "%20")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type.as_deref(), Some("audio/flac"));
    assert_eq!(&response.bytes[..], b"fLaC original bytes");
}

#[tokio::test]
async fn test_stream_missing_song() {
    let fixture = TestFixture::without_ffmpeg();
    let response = fixture.get("/api/v0/stream/Nobody/missing.flac").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "song not found");
}

#[tokio::test]
async fn test_stream_rejects_parent_dir() {
    let fixture = TestFixture::without_ffmpeg();
    fixture.add_song("song.mp3", b"audio");

    let response = fixture.get("/api/v0/stream/Artist/../../song.mp3").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transcode_when_subsystem_disabled() {
    let fixture = TestFixture::without_ffmpeg();
    let song = fixture.add_song("song.flac", b"audio");

    let response = fixture
        .get(&format!("/api/v0/stream/{}?codec=MP3&quality=128", song))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .contains("transcoding is disabled"));
}

#[tokio::test]
async fn test_transcode_codec_disabled() {
    let fixture = TestFixture::with_codecs(&[Codec::Mp3]);
    let song = fixture.add_song("song.flac", b"audio");

    let response = fixture
        .get(&format!("/api/v0/stream/{}?codec=OGG&quality=standard", song))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json()["error"],
        "libvorbis codec not found, OGG transcoding is disabled"
    );
}

#[tokio::test]
async fn test_transcode_invalid_codec_and_quality() {
    let fixture = TestFixture::with_codecs(&Codec::ALL);
    let song = fixture.add_song("song.flac", b"audio");

    let response = fixture
        .get(&format!("/api/v0/stream/{}?codec=WMA&quality=128", song))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = fixture
        .get(&format!("/api/v0/stream/{}?codec=mp3&quality=128", song))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = fixture
        .get(&format!("/api/v0/stream/{}?codec=MP3&quality=999", song))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = fixture
        .get(&format!("/api/v0/stream/{}?codec=MP3", song))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "quality is required when transcoding"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_transcode_streams_tool_output() {
    let fixture = TestFixture::with_codecs(&Codec::ALL);
    let payload: Vec<u8> = (0..32 * 1024).map(|i| (i % 199) as u8).collect();
    let song = fixture.add_song("Artist/song.flac", &payload);

    let response = fixture
        .get(&format!("/api/v0/stream/{}?codec=OPUS&quality=128", song))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.content_type.as_deref(),
        Some("audio/ogg; codecs=opus")
    );
    assert_eq!(&response.bytes[..], &payload[..]);
}
