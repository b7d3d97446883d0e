//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

use crate::handlers::{chat, get_frames, health, upload_video};
use crate::middleware::{cors_layer, request_logging, security_headers};
use crate::state::AppState;

/// Headroom for multipart boundaries and part headers on top of the
/// raw video size limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/upload", post(upload_video))
        .route("/chat", post(chat))
        .route("/frames/:session_id", get(get_frames))
        .route("/health", get(health))
        // Extracted frames are served directly off disk
        .nest_service(
            "/static/frames",
            ServeDir::new(&state.config.frames_root),
        )
        // Size ceiling is enforced before any processing begins
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
