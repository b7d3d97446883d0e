//! In-memory session registry and conversation state.
//!
//! Sessions are volatile and process-lifetime-bound: nothing here
//! survives a restart. The registry provides per-session locking so
//! concurrent requests for one session serialize, and an idle-TTL
//! sweep so abandoned sessions do not accumulate forever.

pub mod conversation;
pub mod store;

pub use conversation::{Conversation, CHAT_APOLOGY, NO_ANALYSIS_SENTINEL};
pub use store::{Session, SessionStore};
