//! # 사용자 관리 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/users | 사용자 목록 |
//! | POST | /api/v1/users | 사용자 생성 |
//! | GET/PUT/DELETE | /api/v1/users/{id} | 단일 조회/수정/삭제 |
//! | PATCH | /api/v1/users/{id}/password | 비밀번호 변경 |
//!
//! 비밀번호 변경을 제외한 모든 핸들러는 그룹의 `users` 권한이 필요합니다.
//! 비밀번호 변경은 본인이거나 `users` 권한이 있으면 허용됩니다.

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{require_permission, AuthUser},
    models::*,
    routes::{audit, AppState},
    services::password::{hash_password, verify_password},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

const MODULE: &str = "users";

pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;

    let users: Vec<UserResponse> = db_users::list_users(&state.pool)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(json!({ "users": users })))
}

pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;

    let user = db_users::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;
    let Json(req) = payload?;
    req.validate()?;

    let password_hash = hash_password(&req.password)?;
    let user = db_users::create_user(&state.pool, &req, &password_hash).await?;
    audit(
        &state,
        &auth_user,
        AuditAction::Create,
        MODULE,
        format!("Created user {}", user.login),
    )
    .await;

    Ok(Json(user.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;
    let Json(req) = payload?;
    req.validate()?;

    let user = db_users::update_user(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!("Updated user {}", user.login),
    )
    .await;

    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_permission(&state.pool, &auth_user, Permission::Users).await?;

    // 마지막 관리자가 스스로를 지워 아무도 로그인할 수 없게 되는 상황을 막습니다.
    if id == auth_user.user_id {
        return Err(AppError::BadRequest("You cannot delete your own account".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !db_users::delete_user(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    audit(
        &state,
        &auth_user,
        AuditAction::Delete,
        MODULE,
        format!("Deleted user {}", user.login),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /users/{id}/password` + `{ "current_password": "...", "new_password": "..." }`
///
/// 성공하면 대상 사용자의 리프레시 토큰을 모두 폐기해 다른 기기에서 다시 로그인하게 합니다.
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let is_self = id == auth_user.user_id;
    if !is_self {
        require_permission(&state.pool, &auth_user, Permission::Users).await?;
    }
    let Json(req) = payload?;
    validate_password(&req.new_password)?;

    let user = db_users::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    if is_self && !verify_password(&req.current_password, &user.password_hash)? {
        return Err(AppError::BadRequest("Current password is incorrect".to_string()));
    }

    let password_hash = hash_password(&req.new_password)?;
    db_users::update_password(&state.pool, &id, &password_hash).await?;
    db_users::delete_user_refresh_tokens(&state.pool, &id).await?;

    audit(
        &state,
        &auth_user,
        AuditAction::Update,
        MODULE,
        format!("Changed password of user {}", user.login),
    )
    .await;

    Ok(StatusCode::NO_CONTENT)
}
