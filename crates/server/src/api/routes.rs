use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, stream};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Transcoding
        .route("/transcode", get(handlers::transcode_status))
        // Streaming
        .route("/stream/{*path}", get(stream::stream_song))
        .with_state(state);

    Router::new()
        .nest("/api/v0", api_routes)
        .layer(TraceLayer::new_for_http())
}
