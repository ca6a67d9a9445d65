use crate::{
    db::{self, users as db_users},
    error::AppError,
    middleware::auth::{
        create_access_token, create_refresh_token, hash_token, verify_token, AuthUser, TokenKind,
        REFRESH_TOKEN_DAYS,
    },
    models::*,
    routes::AppState,
    services::password::verify_password,
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

/// 액세스/리프레시 토큰 쌍을 발급하고 리프레시 토큰 해시를 저장합니다.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    // Store refresh token hash
    let token_id = uuid::Uuid::now_v7().to_string();
    let token_hash = hash_token(&refresh_token);
    let expires_at = (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db_users::store_refresh_token(&state.pool, &token_id, &user.id, &token_hash, &expires_at)
        .await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

/// `POST /auth/login`: 로그인 ID 또는 이메일과 비밀번호로 로그인합니다.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload?;

    // 계정 존재 여부를 드러내지 않도록 두 경우 모두 같은 메시지를 씁니다.
    let invalid = || AppError::Unauthorized("Invalid login or password".to_string());

    let user = db_users::find_by_login_or_email(&state.pool, &req.login)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::info!(login = %req.login, "Failed login attempt");
        return Err(invalid());
    }

    let user_id = user.id.clone();
    let description = format!("User {} logged in", user.login);
    let response = issue_tokens(&state, user).await?;

    db::record(
        &state.pool,
        NewAuditLog {
            user_id: Some(user_id.as_str()),
            action: AuditAction::Login,
            module: "auth",
            description,
            level: AuditLevel::Info,
        },
    )
    .await;

    Ok(Json(response))
}

/// `POST /auth/refresh`: 리프레시 토큰을 새 토큰 쌍으로 교환합니다 (회전 방식).
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(req) = payload?;

    verify_token(&req.refresh_token, &state.jwt_secret, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let token_hash = hash_token(&req.refresh_token);
    let (_token_id, user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    let expires = chrono::NaiveDateTime::parse_from_str(&expires_at, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() {
        db_users::delete_refresh_token(&state.pool, &token_hash).await?;
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    // 토큰 폐기가 곧 사용권 획득입니다. 다른 요청이 먼저 지웠다면 새 토큰을 주지 않습니다.
    if !db_users::delete_refresh_token(&state.pool, &token_hash).await? {
        return Err(AppError::Unauthorized("Refresh token not found or revoked".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

/// `POST /auth/logout`: 이 사용자의 모든 리프레시 토큰을 폐기합니다.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, &auth_user.user_id).await?;

    super::audit(
        &state,
        &auth_user,
        AuditAction::Logout,
        "auth",
        "User logged out".to_string(),
    )
    .await;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// `GET /auth/me`: 로그인한 사용자와 그룹 권한
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let group = db::get_group_for_user(&state.pool, &auth_user.user_id).await?;

    Ok(Json(MeResponse {
        user: user.into(),
        group,
    }))
}
