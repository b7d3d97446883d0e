//! Frame artifact wire shape.

use serde::{Deserialize, Serialize};

/// One extracted frame as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameArtifact {
    /// Bare filename, e.g. `frame_0.jpg`
    pub path: String,
    /// URL under the statically served frames tree
    pub url: String,
    /// Saved frame index (insertion order, zero-based)
    pub timestamp: usize,
}

impl FrameArtifact {
    /// Build the wire shape for a saved frame of a session.
    pub fn new(session_id: impl std::fmt::Display, filename: impl Into<String>, index: usize) -> Self {
        let filename = filename.into();
        Self {
            url: format!("/static/frames/{}/{}", session_id, filename),
            path: filename,
            timestamp: index,
        }
    }
}
