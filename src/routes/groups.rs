//! 사용자 그룹(권한 묶음) 핸들러. 모두 `users` 권한이 필요합니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::{require_permission, AuthUser},
    models::*,
    routes::{audit, AppState},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const MODULE: &str = "groups";

pub async fn list_groups(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;

    let groups = db::list_groups(&state.pool).await?;
    Ok(Json(json!({ "groups": groups })))
}

pub async fn get_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserGroup>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;

    let group = db::get_group(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(group))
}

pub async fn create_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<UserGroupRequest>, JsonRejection>,
) -> Result<Json<UserGroup>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;
    let Json(req) = payload?;
    req.validate()?;

    let group = db::create_group(&state.pool, &req).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        MODULE,
        format!("Created group {}", group.name),
    )
    .await;

    Ok(Json(group))
}

pub async fn update_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UserGroupRequest>, JsonRejection>,
) -> Result<Json<UserGroup>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;
    let Json(req) = payload?;
    req.validate()?;

    let group = db::update_group(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!("Updated group {}", group.name),
    )
    .await;

    Ok(Json(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;

    let group = db::get_group(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !db::delete_group(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        MODULE,
        format!("Deleted group {}", group.name),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
