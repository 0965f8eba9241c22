use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version, whether storage and the LLM are usable, and the
/// number of open form sessions.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "succession-api",
        "storage_connected": state.gateway.is_connected(),
        "llm_configured": state.gateway.is_llm_configured(),
        "active_sessions": state.sessions.active_count().await
    }))
}
