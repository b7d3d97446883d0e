//! Video upload and analysis handler.

use axum::extract::{Multipart, State};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Serialize;
use tracing::info;

use vchat_media::staging::session_frames_dir;
use vchat_media::{release_staged, sample_frames, stage_upload};
use vchat_models::{has_allowed_extension, FrameArtifact, ALLOWED_EXTENSIONS};

use crate::error::{ApiError, ApiResult};
use crate::gateway::ANALYSIS_PROMPT;
use crate::state::AppState;

use super::{presented_session, with_session_cookie};

/// Upload response.
#[derive(Serialize)]
pub struct UploadResponse {
    pub summary: String,
    pub session_id: String,
    pub frames: Vec<FrameArtifact>,
    pub status: &'static str,
}

/// Handle `POST /upload`: stage the video, sample frames, summarize,
/// and reset the session's conversation to the new summary.
pub async fn upload_video(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> ApiResult<(CookieJar, Json<UploadResponse>)> {
    let (original_name, bytes) = read_video_field(&mut multipart).await?;

    let (session_id, session) = state.sessions.get_or_create(presented_session(&jar)).await;
    let jar = with_session_cookie(jar, session_id);

    // Per-session critical section: frame-dir reset, sampling and
    // history commit must not interleave with another request for the
    // same session.
    let mut conversation = session.lock_conversation().await;

    let staged = stage_upload(&state.config.temp_dir, session_id, &original_name, &bytes)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to stage upload");
            ApiError::processing("Failed to store uploaded video")
        })?;

    // The staged upload is released exactly once, on every exit path
    // from here on, whatever sampling or summarization does.
    let staged_for_cleanup = staged.clone();
    let _release = scopeguard::guard((), move |_| {
        tokio::spawn(async move { release_staged(&staged_for_cleanup).await });
    });

    let frames_dir = session_frames_dir(&state.config.frames_root, session_id);
    let frames = sample_frames(&staged, &frames_dir, state.config.max_frames).await?;

    let summary = state.gateway.summarize(&frames, ANALYSIS_PROMPT).await?;

    // History is only committed after a successful summary; a gateway
    // failure above leaves the session without an entry.
    conversation.begin_summary(&summary);

    info!(
        session_id = %session_id,
        frames = frames.len(),
        "Video analyzed"
    );

    let frame_info = frames
        .iter()
        .enumerate()
        .filter_map(|(idx, path)| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| FrameArtifact::new(session_id, name, idx))
        })
        .collect();

    Ok((
        jar,
        Json(UploadResponse {
            summary,
            session_id: session_id.to_string(),
            frames: frame_info,
            status: "success",
        }),
    ))
}

/// Pull and validate the `video` multipart field.
async fn read_video_field(multipart: &mut Multipart) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some("video") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::validation("No file provided"))?;

        if !has_allowed_extension(&filename) {
            return Err(ApiError::validation(format!(
                "Invalid file type. Allowed types: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("video/") {
            return Err(ApiError::validation(
                "Invalid content type. Must be a video file.",
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Malformed upload: {}", e)))?;

        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::validation("No video file uploaded"))
}
