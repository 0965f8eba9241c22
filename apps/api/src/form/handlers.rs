//! Axum route handlers for the intake form.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::sections::Section;
use crate::models::submission::{Field, SubmissionRecord};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub session_id: Uuid,
    pub draft: SubmissionRecord,
}

/// Request body cap for the upload route. Contents are streamed past, never
/// buffered.
pub const UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024;

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = state
        .sessions
        .snapshot(id)
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DraftResponse {
        session_id: id,
        draft,
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// PUT /api/v1/sessions/:id/fields
pub async fn handle_set_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(field): Json<Field>,
) -> Result<Json<DraftResponse>, AppError> {
    let draft = state
        .sessions
        .update(id, |form| form.set_field(field))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DraftResponse {
        session_id: id,
        draft,
    }))
}

/// PUT /api/v1/sessions/:id/{personal,company,financial,sector,management,employees}
pub async fn handle_section<S>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(section): Json<S>,
) -> Result<Json<DraftResponse>, AppError>
where
    S: Section + DeserializeOwned + Send + 'static,
{
    let draft = state
        .sessions
        .update(id, |form| form.apply_section(section))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DraftResponse {
        session_id: id,
        draft,
    }))
}

/// POST /api/v1/sessions/:id/financial/uploads
///
/// Records the file name of every multipart part that carries one, replacing
/// the names from any earlier upload. File contents are discarded.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DraftResponse>, AppError> {
    let mut names = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if let Some(name) = field.file_name() {
            names.push(name.to_string());
        }
    }

    info!("Captured {} uploaded file name(s) for session {id}", names.len());

    let draft = state
        .sessions
        .update(id, |form| form.set_field(Field::UploadedFiles(names)))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(Json(DraftResponse {
        session_id: id,
        draft,
    }))
}
