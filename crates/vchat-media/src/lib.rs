//! FFmpeg CLI wrapper for the VideoChat backend.
//!
//! This crate provides:
//! - Video probing (frame rate, frame count) via ffprobe
//! - Budget-capped frame sampling via ffmpeg
//! - Upload staging and frame-directory lifecycle

pub mod error;
pub mod probe;
pub mod sampler;
pub mod staging;

pub use error::{MediaError, MediaResult};
pub use probe::{probe_video, VideoInfo};
pub use sampler::{sample_frames, sampling_stride, DEFAULT_MAX_FRAMES};
pub use staging::{release_staged, reset_frame_dir, stage_upload};
