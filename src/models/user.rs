use serde::{Deserialize, Serialize};

use super::group::UserGroup;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub login: String,
    pub email: String,
    pub mobile: Option<String>,
    pub group_id: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub login: String,
    pub email: String,
    pub mobile: Option<String>,
    pub group_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            login: user.login,
            email: user.email,
            mobile: user.mobile,
            group_id: user.group_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `POST /users`
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub login: String,
    pub email: String,
    pub mobile: Option<String>,
    pub group_id: Option<String>,
    pub password: String,
}

/// `PUT /users/{id}`: 비밀번호는 별도 엔드포인트에서만 바꿉니다.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub login: String,
    pub email: String,
    pub mobile: Option<String>,
    pub group_id: Option<String>,
}

fn validate_identity(name: &str, login: &str, email: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if login.trim().len() < 3 {
        return Err(AppError::BadRequest("Login must be at least 3 characters".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::BadRequest("Password must be at least 8 characters".to_string()));
    }
    Ok(())
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_identity(&self.name, &self.login, &self.email)?;
        validate_password(&self.password)
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_identity(&self.name, &self.login, &self.email)
    }
}

/// `PATCH /users/{id}/password`
///
/// 본인 비밀번호를 바꿀 때는 `current_password`가 맞아야 합니다.
/// `users` 권한으로 다른 사용자의 비밀번호를 재설정할 때는 확인하지 않습니다.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    pub new_password: String,
}

/// `login` 필드에는 로그인 ID나 이메일 둘 다 받을 수 있습니다.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// `GET /auth/me`: 화면 메뉴 노출 여부를 정할 수 있도록 그룹 권한을 함께 돌려줍니다.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub group: Option<UserGroup>,
}
