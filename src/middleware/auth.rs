//! # 인증 미들웨어
//!
//! - `AuthUser`: `Authorization: Bearer <JWT>` 헤더에서 사용자 ID를 꺼내는 Extractor
//! - `require_permission`: 사용자의 그룹 권한 플래그를 확인하는 게이트
//! - 액세스/리프레시 토큰 발급과 검증, 리프레시 토큰 해시

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    models::{Permission, UserGroup},
    routes::AppState,
};

pub const ACCESS_TOKEN_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
    /// 같은 초에 발급된 토큰도 서로 다르도록 붙이는 고유 ID
    pub jti: String,
    pub kind: TokenKind,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = verify_token(token, &state.jwt_secret, TokenKind::Access)?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// 사용자의 그룹이 `permission`을 허용하는지 확인하고, 허용하면 그 그룹을 돌려줍니다.
///
/// 그룹이 없는 사용자는 어떤 권한도 없습니다.
pub async fn require_permission(
    pool: &SqlitePool,
    user: &AuthUser,
    permission: Permission,
) -> Result<UserGroup, AppError> {
    let group = db::get_group_for_user(pool, &user.user_id).await?;

    match group {
        Some(group) if group.allows(permission) => Ok(group),
        _ => {
            tracing::debug!(user_id = %user.user_id, permission = permission.name(), "permission denied");
            Err(AppError::Forbidden(format!(
                "Missing permission: {}",
                permission.name()
            )))
        }
    }
}

fn create_token(
    user_id: &str,
    secret: &str,
    kind: TokenKind,
    lifetime: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        jti: uuid::Uuid::now_v7().to_string(),
        kind,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        secret,
        TokenKind::Access,
        Duration::minutes(ACCESS_TOKEN_MINUTES),
    )
}

pub fn create_refresh_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        secret,
        TokenKind::Refresh,
        Duration::days(REFRESH_TOKEN_DAYS),
    )
}

/// 서명과 만료를 검증하고, 토큰 종류가 `expected`와 다르면 거부합니다.
/// 리프레시 토큰을 Bearer 토큰으로 쓰는 것을 막습니다.
pub fn verify_token(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.kind != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_access_token_roundtrip() {
        let token = create_access_token("user-1", SECRET).unwrap();
        let claims = verify_token(&token, SECRET, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_MINUTES * 60);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let token = create_refresh_token("user-1", SECRET).unwrap();
        assert!(matches!(
            verify_token(&token, SECRET, TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
        assert!(verify_token(&token, SECRET, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_access_token("user-1", SECRET).unwrap();
        assert!(verify_token(&token, "other", TokenKind::Access).is_err());
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let a = create_refresh_token("user-1", SECRET).unwrap();
        let b = create_refresh_token("user-1", SECRET).unwrap();
        assert_ne!(hash_token(&a), hash_token(&b));
    }
}
