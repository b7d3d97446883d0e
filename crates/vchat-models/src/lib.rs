//! Shared data models for the VideoChat backend.
//!
//! This crate provides Serde-serializable types for:
//! - Conversation turns and roles
//! - Session identifiers
//! - Frame artifact wire shapes
//! - Upload filename sanitization

pub mod filename;
pub mod frame;
pub mod session_id;
pub mod turn;

// Re-export common types
pub use filename::{has_allowed_extension, sanitize_filename, ALLOWED_EXTENSIONS};
pub use frame::FrameArtifact;
pub use session_id::{SessionId, SessionIdError};
pub use turn::{Role, Turn};
