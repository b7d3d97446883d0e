//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vchat_media::MediaError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// User input fault: missing file, bad extension, no question.
    #[error("{0}")]
    Validation(String),

    /// The uploaded video could not be processed.
    #[error("{0}")]
    Processing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The AI gateway call failed during summarization.
    #[error("AI gateway error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn processing(msg: impl Into<String>) -> Self {
        Self::Processing(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Processing(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Gateway(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(e: MediaError) -> Self {
        match e {
            MediaError::UnopenableVideo(_) => {
                Self::Processing("Could not open video file".to_string())
            }
            MediaError::NoFramesExtracted => {
                Self::Processing("No frames could be extracted from the video".to_string())
            }
            MediaError::FileNotFound(_) => {
                Self::Processing("Could not open video file".to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// JSON error envelope: `{"error": "..."}`.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Never expose gateway or internal detail to the client
        let error = match &self {
            ApiError::Gateway(_) => "Failed to analyze video".to_string(),
            ApiError::Internal(msg) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An unexpected error occurred during processing".to_string()
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::processing("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::gateway("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_media_error_mapping() {
        let e: ApiError = MediaError::NoFramesExtracted.into();
        assert!(matches!(e, ApiError::Processing(_)));

        let e: ApiError = MediaError::UnopenableVideo("bad".into()).into();
        assert!(matches!(e, ApiError::Processing(_)));

        let e: ApiError = MediaError::FfmpegNotFound.into();
        assert!(matches!(e, ApiError::Internal(_)));
    }
}
