//! Axum HTTP API server.
//!
//! This crate provides:
//! - Video upload, frame sampling and AI summarization
//! - Session-scoped follow-up chat
//! - Static serving of extracted frames
//! - Cookie-based session identity

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use gateway::{AiGateway, GeminiClient, ANALYSIS_PROMPT};
pub use routes::create_router;
pub use state::AppState;
