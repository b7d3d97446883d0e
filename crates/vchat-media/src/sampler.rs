//! Budget-capped frame sampling.
//!
//! Given a video's frame rate and total frame count, a sampling
//! stride is computed so that short videos yield roughly one frame
//! per second and long videos yield evenly spaced frames capped near
//! the budget. Frames whose zero-based sequential index is a multiple
//! of the stride are kept and written as JPEGs with contiguous saved
//! indices.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;
use crate::staging::reset_dir;

/// Default frame budget per upload.
pub const DEFAULT_MAX_FRAMES: u64 = 20;

/// Hard ceiling on a single ffmpeg extraction pass.
const SAMPLE_TIMEOUT_SECS: u64 = 300;

/// Compute the sampling stride for a video.
///
/// `max(round(fps), floor(total_frames / max_frames))`, floored at 1.
/// The floor is a deliberate fix for degenerate stream metadata
/// (`total_frames < max_frames` with an fps that rounds to zero),
/// which would otherwise produce a zero stride.
pub fn sampling_stride(total_frames: u64, fps: f64, max_frames: u64) -> u64 {
    let per_second = fps.round().max(0.0) as u64;
    let budget = if max_frames > 0 {
        total_frames / max_frames
    } else {
        0
    };
    per_second.max(budget).max(1)
}

/// Number of frames a sequential keep-every-`stride` pass yields.
fn expected_frame_count(total_frames: u64, stride: u64) -> u64 {
    total_frames.div_ceil(stride)
}

/// Extract up to `max_frames` representative frames into `target_dir`.
///
/// Any pre-existing files in `target_dir` are removed first, so the
/// directory holds exactly one upload's artifacts. Written files are
/// named `frame_<n>.jpg` with `n` contiguous from 0 in keep order.
///
/// The source video is left in place; releasing the staged upload is
/// the caller's responsibility.
pub async fn sample_frames(
    video_path: impl AsRef<Path>,
    target_dir: impl AsRef<Path>,
    max_frames: u64,
) -> MediaResult<Vec<PathBuf>> {
    let video_path = video_path.as_ref();
    let target_dir = target_dir.as_ref();

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let info = probe_video(video_path).await?;
    if info.total_frames == 0 {
        return Err(MediaError::NoFramesExtracted);
    }

    let stride = sampling_stride(info.total_frames, info.fps, max_frames);
    debug!(
        total_frames = info.total_frames,
        fps = info.fps,
        stride,
        expected = expected_frame_count(info.total_frames, stride),
        "Sampling video"
    );

    // Stale-artifact invariant: old frames never survive a new upload.
    reset_dir(target_dir).await?;

    let output_pattern = target_dir.join("frame_%d.jpg");
    let filter = format!("select=not(mod(n\\,{}))", stride);

    let child = Command::new("ffmpeg")
        .arg("-y")
        .args(["-v", "error"])
        .arg("-i")
        .arg(video_path)
        .args(["-vf", &filter])
        .args(["-vsync", "vfr"])
        .args(["-q:v", "2"])
        .args(["-start_number", "0"])
        .arg(&output_pattern)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    let output = tokio::time::timeout(Duration::from_secs(SAMPLE_TIMEOUT_SECS), child)
        .await
        .map_err(|_| MediaError::Timeout(SAMPLE_TIMEOUT_SECS))??;

    if !output.status.success() {
        return Err(MediaError::UnopenableVideo(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let frames = collect_frames(target_dir).await?;
    if frames.is_empty() {
        warn!(video = %video_path.display(), "FFmpeg wrote no frames");
        return Err(MediaError::NoFramesExtracted);
    }

    info!(
        count = frames.len(),
        dir = %target_dir.display(),
        "Extracted frames"
    );

    Ok(frames)
}

/// Collect `frame_<n>.jpg` files from a directory in saved-index order.
async fn collect_frames(dir: &Path) -> MediaResult<Vec<PathBuf>> {
    let mut indexed: Vec<(u64, PathBuf)> = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(index) = frame_index(&path) {
            indexed.push((index, path));
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}

/// Parse the saved index out of a `frame_<n>.jpg` filename.
fn frame_index(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    name.strip_prefix("frame_")?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stride_short_video_one_per_second() {
        // 100 frames at 10fps: one-per-second wins over 100/20
        assert_eq!(sampling_stride(100, 10.0, 20), 10);
        assert_eq!(expected_frame_count(100, 10), 10);
    }

    #[test]
    fn test_stride_long_video_budget_capped() {
        // 6000 frames at 30fps: budget term wins
        assert_eq!(sampling_stride(6000, 30.0, 20), 300);
        assert_eq!(expected_frame_count(6000, 300), 20);
    }

    #[test]
    fn test_stride_exceeds_total_frames() {
        // 15 frames at 30fps: stride 30 > total, only frame 0 kept
        assert_eq!(sampling_stride(15, 30.0, 20), 30);
        assert_eq!(expected_frame_count(15, 30), 1);
    }

    #[test]
    fn test_stride_floored_at_one() {
        // Degenerate metadata: fps rounds to 0 and total < budget
        assert_eq!(sampling_stride(5, 0.2, 20), 1);
        assert_eq!(expected_frame_count(5, 1), 5);
    }

    #[test]
    fn test_frame_index_parsing() {
        assert_eq!(frame_index(Path::new("/x/frame_0.jpg")), Some(0));
        assert_eq!(frame_index(Path::new("/x/frame_12.jpg")), Some(12));
        assert_eq!(frame_index(Path::new("/x/frame_.jpg")), None);
        assert_eq!(frame_index(Path::new("/x/thumb_1.jpg")), None);
        assert_eq!(frame_index(Path::new("/x/frame_1.png")), None);
    }

    #[tokio::test]
    async fn test_collect_frames_sorted_numerically() {
        let dir = TempDir::new().unwrap();
        for i in [10u64, 0, 2, 1] {
            tokio::fs::write(dir.path().join(format!("frame_{}.jpg", i)), b"x")
                .await
                .unwrap();
        }
        // Non-frame files are ignored
        tokio::fs::write(dir.path().join("notes.txt"), b"x")
            .await
            .unwrap();

        let frames = collect_frames(dir.path()).await.unwrap();
        let names: Vec<_> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["frame_0.jpg", "frame_1.jpg", "frame_2.jpg", "frame_10.jpg"]
        );
    }

    #[tokio::test]
    async fn test_sample_unopenable_video() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("missing.mp4");
        let err = sample_frames(&video, dir.path().join("frames"), DEFAULT_MAX_FRAMES)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MediaError::FileNotFound(_) | MediaError::FfmpegNotFound | MediaError::FfprobeNotFound
        ));
    }
}
