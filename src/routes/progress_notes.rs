//! # 경과 기록 라우트 핸들러
//!
//! - `GET    /api/v1/progress-notes?client_id=`
//! - `POST   /api/v1/progress-notes`
//! - `GET    /api/v1/progress-notes/{id}`
//! - `PUT    /api/v1/progress-notes/{id}`
//! - `DELETE /api/v1/progress-notes/{id}`
//!
//! 그룹의 `progress_notes` 권한이 필요합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::{require_permission, AuthUser},
    models::*,
    routes::{audit, AppState},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const MODULE: &str = "progress_notes";

pub async fn list_progress_notes(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ProgressNoteListQuery>,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::ProgressNotes).await?;

    let notes = db::list_progress_notes(&state.pool, query.client_id.as_deref()).await?;
    Ok(Json(json!({ "progress_notes": notes })))
}

pub async fn get_progress_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProgressNote>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::ProgressNotes).await?;

    let note = db::get_progress_note(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(note))
}

pub async fn create_progress_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ProgressNoteRequest>, JsonRejection>,
) -> Result<Json<ProgressNote>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::ProgressNotes).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let note = db::create_progress_note(&state.pool, &req).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        MODULE,
        format!("Created progress note for {} on {}", note.client_name, note.date),
    )
    .await;

    Ok(Json(note))
}

pub async fn update_progress_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ProgressNoteRequest>, JsonRejection>,
) -> Result<Json<ProgressNote>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::ProgressNotes).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let note = db::update_progress_note(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!("Updated progress note for {} on {}", note.client_name, note.date),
    )
    .await;

    Ok(Json(note))
}

pub async fn delete_progress_note(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::ProgressNotes).await?;

    if !db::delete_progress_note(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        MODULE,
        format!("Deleted progress note {}", id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
