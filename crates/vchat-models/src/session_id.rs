//! Session identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a presented session token is not a valid ID.
#[derive(Debug, Error)]
#[error("invalid session id: {0}")]
pub struct SessionIdError(String);

/// Opaque per-browser session identifier.
///
/// Minted server-side as a random UUID and carried back by the client
/// in a cookie. Parsing rejects anything that is not a UUID, which
/// also keeps path-traversal garbage out of filesystem paths derived
/// from the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh globally-unique session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(SessionId)
            .map_err(|_| SessionIdError(s.to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_session_id_round_trip() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_session_id_rejects_garbage() {
        assert!("../../etc/passwd".parse::<SessionId>().is_err());
        assert!("".parse::<SessionId>().is_err());
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
