//! # 내담자(Client) 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/clients | `list_clients` | 목록 (`search`, `active`, `client_type_id` 필터) |
//! | POST | /api/v1/clients | `create_client` | 새 내담자 등록 |
//! | GET | /api/v1/clients/{id} | `get_client` | 단일 조회 |
//! | PUT | /api/v1/clients/{id} | `update_client` | 전체 수정 |
//! | DELETE | /api/v1/clients/{id} | `delete_client` | 삭제 (상담/기록 함께 삭제) |
//! | GET | /api/v1/client-types | `list_client_types` | 내담자 유형 목록 |
//! | POST | /api/v1/client-types | `create_client_type` | 유형 생성 |
//! | PUT | /api/v1/client-types/{id} | `update_client_type` | 유형 수정 |
//! | DELETE | /api/v1/client-types/{id} | `delete_client_type` | 유형 삭제 |
//!
//! 모든 핸들러는 그룹의 `records` 권한이 필요합니다.

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

const MODULE: &str = "clients";

/// `GET /clients` → `{ "clients": [...] }`
pub async fn list_clients(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;

    let clients = db::list_clients(&state.pool, &query).await?;
    Ok(Json(json!({ "clients": clients })))
}

pub async fn get_client(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Client>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;

    let client = db::get_client(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(client))
}

pub async fn create_client(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<Json<Client>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let client = db::create_client(&state.pool, &req).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        MODULE,
        format!("Created client {}", client.name),
    )
    .await;

    Ok(Json(client))
}

pub async fn update_client(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ClientRequest>, JsonRejection>,
) -> Result<Json<Client>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;
    let Json(req) = payload?;
    let req = req.validated()?;

    let client = db::update_client(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!("Updated client {}", client.name),
    )
    .await;

    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;

    let client = db::get_client(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !db::delete_client(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        MODULE,
        format!("Deleted client {}", client.name),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

// ── 내담자 유형 ──

pub async fn list_client_types(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;

    let client_types = db::list_client_types(&state.pool).await?;
    Ok(Json(json!({ "client_types": client_types })))
}

pub async fn create_client_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<ClientTypeRequest>, JsonRejection>,
) -> Result<Json<ClientType>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;
    let Json(req) = payload?;
    req.validate()?;

    let client_type = db::create_client_type(&state.pool, &req).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        "client_types",
        format!("Created client type {}", client_type.name),
    )
    .await;

    Ok(Json(client_type))
}

pub async fn update_client_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ClientTypeRequest>, JsonRejection>,
) -> Result<Json<ClientType>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;
    let Json(req) = payload?;
    req.validate()?;

    let client_type = db::update_client_type(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        "client_types",
        format!("Updated client type {}", client_type.name),
    )
    .await;

    Ok(Json(client_type))
}

pub async fn delete_client_type(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Records).await?;

    if !db::delete_client_type(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        "client_types",
        format!("Deleted client type {}", id),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
