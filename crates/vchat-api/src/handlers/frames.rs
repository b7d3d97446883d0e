//! Frame listing handler.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use vchat_media::staging::session_frames_dir;
use vchat_models::SessionId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// One frame in a listing.
#[derive(Serialize)]
pub struct FrameEntry {
    pub path: String,
    pub url: String,
}

/// Frame listing response.
#[derive(Serialize)]
pub struct FramesResponse {
    pub frames: Vec<FrameEntry>,
}

/// Handle `GET /frames/:session_id`: list a session's extracted
/// frames sorted by filename, or 404 when none exist.
pub async fn get_frames(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<FramesResponse>> {
    // An unparseable id can never have a frame directory
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| ApiError::not_found("No frames found for this session"))?;

    let dir = session_frames_dir(&state.config.frames_root, session_id);
    if !dir.is_dir() {
        return Err(ApiError::not_found("No frames found for this session"));
    }

    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .map_err(|_| ApiError::not_found("No frames found for this session"))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "jpg") {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();

    let frames = names
        .into_iter()
        .map(|name| FrameEntry {
            url: format!("/static/frames/{}/{}", session_id, name),
            path: name,
        })
        .collect();

    Ok(Json(FramesResponse { frames }))
}
