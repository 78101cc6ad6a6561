//! Song streaming, raw or transcoded on the fly.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, warn};
use wavepipe_core::{Song, TranscodeError};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for streaming a song
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    /// Output codec (MP3, OGG, OPUS). Omit to stream the original file.
    pub codec: Option<String>,
    /// Quality label for the codec (e.g., "320", "V0", "standard")
    pub quality: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct StreamErrorResponse {
    pub error: String,
}

type StreamError = (StatusCode, Json<StreamErrorResponse>);

fn stream_error(status: StatusCode, message: impl Into<String>) -> StreamError {
    (
        status,
        Json(StreamErrorResponse {
            error: message.into(),
        }),
    )
}

/// Maps transcoder errors to responses.
///
/// Caller errors carry their message. Server faults are logged and reported generically.
fn transcode_error(e: TranscodeError) -> StreamError {
    if !e.is_client_error() {
        error!("Transcode failed: {}", e);
        return stream_error(StatusCode::INTERNAL_SERVER_ERROR, "server error");
    }

    let status = match e {
        TranscodeError::SubsystemDisabled | TranscodeError::CodecDisabled { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::BAD_REQUEST,
    };
    stream_error(status, e.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// Stream a song from the library
pub async fn stream_song(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    Query(params): Query<StreamParams>,
) -> Result<Response, StreamError> {
    let song = state
        .resolve_song(&path)
        .ok_or_else(|| stream_error(StatusCode::NOT_FOUND, "song not found"))?;

    match params.codec {
        None => stream_original(&song).await,
        Some(codec) => {
            let quality = params.quality.ok_or_else(|| {
                stream_error(StatusCode::BAD_REQUEST, "quality is required when transcoding")
            })?;
            stream_transcoded(&state, &song, &codec, &quality).await
        }
    }
}

async fn stream_original(song: &Song) -> Result<Response, StreamError> {
    let file = tokio::fs::File::open(song.path()).await.map_err(|e| {
        error!("Failed to open {}: {}", song.path().display(), e);
        stream_error(StatusCode::INTERNAL_SERVER_ERROR, "server error")
    })?;

    let body = Body::from_stream(ReaderStream::new(file));
    Ok(([(header::CONTENT_TYPE, original_mime_type(&song.file_type))], body).into_response())
}

async fn stream_transcoded(
    state: &AppState,
    song: &Song,
    codec: &str,
    quality: &str,
) -> Result<Response, StreamError> {
    let mut transcoder = state
        .transcoders()
        .create(codec, quality)
        .map_err(transcode_error)?;
    let stream = transcoder.start(song).await.map_err(transcode_error)?;
    let mime_type = transcoder.mime_type();

    // Reap ffmpeg once the body is drained, or once the client goes away and the closed
    // pipe makes ffmpeg exit.
    let path = song.path.clone();
    tokio::spawn(async move {
        match transcoder.wait().await {
            Ok(()) => debug!("Finished transcoding {}", path.display()),
            Err(e) => warn!("Transcode of {} ended early: {}", path.display(), e),
        }
    });

    let body = Body::from_stream(ReaderStream::new(stream));
    Ok(([(header::CONTENT_TYPE, mime_type)], body).into_response())
}

fn original_mime_type(file_type: &str) -> &'static str {
    match file_type {
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/ogg; codecs=opus",
        "m4a" | "aac" => "audio/mp4",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}
