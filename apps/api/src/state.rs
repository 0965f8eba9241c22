use std::sync::Arc;

use crate::config::Config;
use crate::form::sessions::SessionStore;
use crate::gateway::Gateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// One form draft per session; never shared across sessions.
    pub sessions: SessionStore,
    /// Storage and LLM access, constructed once at start-up.
    pub gateway: Arc<Gateway>,
    pub config: Config,
}
