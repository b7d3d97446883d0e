//! Application state.

use std::sync::Arc;

use vchat_session::SessionStore;

use crate::config::ApiConfig;
use crate::gateway::AiGateway;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub sessions: Arc<SessionStore>,
    pub gateway: Arc<dyn AiGateway>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig, gateway: Arc<dyn AiGateway>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_ttl));
        Self {
            config,
            sessions,
            gateway,
        }
    }
}
