//! Upload staging and frame-directory lifecycle.
//!
//! Staged uploads live at `<temp_dir>/<session_id>_<sanitized_name>`
//! and are deleted exactly once when processing finishes, success or
//! not. Frame directories are fully cleared before every sampling
//! pass. Cleanup failures are logged, never propagated.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use vchat_models::{sanitize_filename, SessionId};

use crate::error::MediaResult;

/// Write uploaded bytes to a session-prefixed staging path.
///
/// Creates the scratch directory if absent. Content validation
/// (extension, content-type, size) is the caller's concern.
pub async fn stage_upload(
    temp_dir: impl AsRef<Path>,
    session_id: SessionId,
    original_name: &str,
    bytes: &[u8],
) -> MediaResult<PathBuf> {
    let temp_dir = temp_dir.as_ref();
    fs::create_dir_all(temp_dir).await?;

    let staged = temp_dir.join(format!("{}_{}", session_id, sanitize_filename(original_name)));
    fs::write(&staged, bytes).await?;

    Ok(staged)
}

/// Delete a staged upload. Best effort: failure is telemetry, not an
/// error, so no request path can fail on cleanup alone.
pub async fn release_staged(staged: impl AsRef<Path>) {
    let staged = staged.as_ref();
    if let Err(e) = fs::remove_file(staged).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %staged.display(), error = %e, "Failed to remove staged upload");
        }
    }
}

/// Path of a session's frame directory under the frames root.
pub fn session_frames_dir(frames_root: impl AsRef<Path>, session_id: SessionId) -> PathBuf {
    frames_root.as_ref().join(session_id.to_string())
}

/// Create `dir` if absent and remove every regular file in it.
///
/// Per-file removal failures are logged and skipped.
pub async fn reset_dir(dir: impl AsRef<Path>) -> MediaResult<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() {
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove stale frame");
            }
        }
    }

    Ok(())
}

/// Reset a session's frame directory and return its path.
pub async fn reset_frame_dir(
    frames_root: impl AsRef<Path>,
    session_id: SessionId,
) -> MediaResult<PathBuf> {
    let dir = session_frames_dir(frames_root, session_id);
    reset_dir(&dir).await?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stage_upload_writes_session_prefixed_file() {
        let dir = TempDir::new().unwrap();
        let sid = SessionId::new();

        let staged = stage_upload(dir.path(), sid, "my clip.mp4", b"bytes")
            .await
            .unwrap();

        let name = staged.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, format!("{}_my_clip.mp4", sid));
        assert_eq!(fs::read(&staged).await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_stage_upload_creates_scratch_dir() {
        let dir = TempDir::new().unwrap();
        let scratch = dir.path().join("temp");
        let staged = stage_upload(&scratch, SessionId::new(), "a.mp4", b"x")
            .await
            .unwrap();
        assert!(staged.exists());
    }

    #[tokio::test]
    async fn test_release_staged_removes_file() {
        let dir = TempDir::new().unwrap();
        let staged = dir.path().join("staged.mp4");
        fs::write(&staged, b"x").await.unwrap();

        release_staged(&staged).await;
        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn test_release_staged_tolerates_missing_file() {
        // Must not panic or error on an already-gone file
        release_staged("/nonexistent/staged.mp4").await;
    }

    #[tokio::test]
    async fn test_reset_frame_dir_clears_old_artifacts() {
        let dir = TempDir::new().unwrap();
        let sid = SessionId::new();

        let frames = reset_frame_dir(dir.path(), sid).await.unwrap();
        fs::write(frames.join("frame_0.jpg"), b"old").await.unwrap();
        fs::write(frames.join("frame_1.jpg"), b"old").await.unwrap();

        let frames = reset_frame_dir(dir.path(), sid).await.unwrap();
        let mut entries = fs::read_dir(&frames).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_frame_dir_creates_when_absent() {
        let dir = TempDir::new().unwrap();
        let frames = reset_frame_dir(dir.path(), SessionId::new()).await.unwrap();
        assert!(frames.is_dir());
    }
}
