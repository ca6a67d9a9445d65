use crate::error::{conflict_on_unique, AppError};
use crate::models::user::{CreateUserRequest, UpdateUserRequest, User};
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, name, login, email, mobile, group_id, password_hash, created_at, updated_at";

/// 로그인/이메일 UNIQUE 위반은 409, 존재하지 않는 그룹(외래키 위반)은 400으로 바꿉니다.
fn map_user_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest("Unknown user group".to_string())
        }
        _ => conflict_on_unique(err, "Login or email already exists"),
    }
}

pub async fn create_user(
    pool: &SqlitePool,
    req: &CreateUserRequest,
    password_hash: &str,
) -> Result<User, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO users (id, name, login, email, mobile, group_id, password_hash)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.name.trim())
    .bind(req.login.trim())
    .bind(req.email.trim())
    .bind(&req.mobile)
    .bind(&req.group_id)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(map_user_write_error)?;

    find_by_id(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY name COLLATE NOCASE");
    let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;

    Ok(users)
}

/// 로그인 ID 또는 이메일로 사용자를 찾습니다. 로그인 화면은 둘 중 무엇이든 받습니다.
pub async fn find_by_login_or_email(
    pool: &SqlitePool,
    login: &str,
) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE login = ?1 OR email = ?1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(login.trim())
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateUserRequest,
) -> Result<Option<User>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            name = ?, login = ?, email = ?, mobile = ?, group_id = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(req.name.trim())
    .bind(req.login.trim())
    .bind(req.email.trim())
    .bind(&req.mobile)
    .bind(&req.group_id)
    .bind(id)
    .execute(pool)
    .await
    .map_err(map_user_write_error)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    find_by_id(pool, id).await
}

pub async fn update_password(
    pool: &SqlitePool,
    id: &str,
    password_hash: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 사용자를 삭제합니다. 리프레시 토큰은 CASCADE로 함께 지워집니다.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn store_refresh_token(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// `(id, user_id, expires_at)`
pub async fn find_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<(String, String, String)>, AppError> {
    let row = sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT id, user_id, expires_at
        FROM refresh_tokens
        WHERE token_hash = ?
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// 토큰을 지우고, 실제로 지운 행이 있었는지 돌려줍니다.
///
/// 같은 토큰으로 동시에 갱신하면 한 요청만 `true`를 받습니다.
pub async fn delete_refresh_token(pool: &SqlitePool, token_hash: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_user_refresh_tokens(pool: &SqlitePool, user_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
