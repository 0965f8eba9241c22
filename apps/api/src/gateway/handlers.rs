use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::submission::StoredRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Overrides `CONTEXT_RECORD_LIMIT` for this question, capped at
    /// `MAX_CONTEXT_RECORDS`.
    pub limit: Option<usize>,
}

impl AskRequest {
    /// Number of records to read for this question.
    pub fn effective_limit(&self, config: &Config) -> usize {
        self.limit
            .unwrap_or(config.context_record_limit)
            .min(config.max_context_records)
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// POST /api/v1/sessions/:id/submit
///
/// Writes the session's current draft as a new document. The draft is kept,
/// so submitting again stores a duplicate.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<StoredRecord>), AppError> {
    let draft = state
        .sessions
        .snapshot(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;

    let stored = state.gateway.submit(&draft).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// POST /api/v1/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let limit = req.effective_limit(&state.config);
    let answer = state.gateway.answer_question(&req.question, limit).await?;
    Ok(Json(AskResponse { answer }))
}
