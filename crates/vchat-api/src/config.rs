//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Root directory for extracted frames (served statically)
    pub frames_root: PathBuf,
    /// Scratch directory for staged uploads
    pub temp_dir: PathBuf,
    /// Max uploaded video size in bytes
    pub max_upload_bytes: usize,
    /// Frame budget per upload
    pub max_frames: u64,
    /// Timeout on AI gateway calls
    pub gateway_timeout: Duration,
    /// Idle time before a session is evicted
    pub session_ttl: Duration,
    /// Interval between eviction sweeps
    pub eviction_interval: Duration,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            frames_root: PathBuf::from("static/frames"),
            temp_dir: PathBuf::from("temp"),
            max_upload_bytes: 50 * 1024 * 1024, // 50MB
            max_frames: 20,
            gateway_timeout: Duration::from_secs(60),
            session_ttl: Duration::from_secs(3600),
            eviction_interval: Duration::from_secs(300),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            frames_root: std::env::var("FRAMES_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.frames_root),
            temp_dir: std::env::var("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            max_frames: std::env::var("MAX_FRAMES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_frames),
            gateway_timeout: Duration::from_secs(
                std::env::var("GATEWAY_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            session_ttl: Duration::from_secs(
                std::env::var("SESSION_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            eviction_interval: Duration::from_secs(
                std::env::var("SESSION_SWEEP_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
