use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use wavepipe_core::transcode::{CapabilitySnapshot, Codec, CodecProfile};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Transcoding status: what the probe found and what each codec accepts
#[derive(Debug, Serialize)]
pub struct TranscodeStatusResponse {
    pub capabilities: CapabilitySnapshot,
    pub profiles: Vec<ProfileResponse>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub codec: Codec,
    pub available: bool,
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub qualities: Vec<&'static str>,
}

pub async fn transcode_status(State(state): State<Arc<AppState>>) -> Json<TranscodeStatusResponse> {
    let registry = state.registry();

    let profiles = Codec::ALL
        .into_iter()
        .map(|codec| {
            let profile = CodecProfile::for_codec(codec);
            ProfileResponse {
                codec,
                available: registry.supports(codec),
                mime_type: profile.mime_type,
                extension: profile.extension,
                qualities: profile.qualities().collect(),
            }
        })
        .collect();

    Json(TranscodeStatusResponse {
        capabilities: registry.snapshot(),
        profiles,
    })
}
