use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(crate::page::index))
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/convert", post(crate::convert::convert_upload))
        // Uploads are not size-limited.
        .layer(DefaultBodyLimit::disable())
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    ffmpeg: Option<String>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ffmpeg = mkvconv_transcoder::probe::version(&state.converter.ffmpeg_path)
        .await
        .ok();

    Json(HealthResponse {
        status: "ok".to_string(),
        ffmpeg,
    })
}
