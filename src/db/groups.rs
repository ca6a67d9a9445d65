use crate::error::{conflict_on_unique, AppError};
use crate::models::*;
use sqlx::SqlitePool;

const GROUP_COLUMNS: &str = r#"
    id, name, admin, super_admin, records, progress_notes, experiences, receipts,
    expenses, schedule, pdf, users, notes, created_at, updated_at
"#;

pub async fn list_groups(pool: &SqlitePool) -> Result<Vec<UserGroup>, AppError> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM user_groups ORDER BY name COLLATE NOCASE");
    let groups = sqlx::query_as::<_, UserGroup>(&sql).fetch_all(pool).await?;

    Ok(groups)
}

pub async fn get_group(pool: &SqlitePool, id: &str) -> Result<Option<UserGroup>, AppError> {
    let sql = format!("SELECT {GROUP_COLUMNS} FROM user_groups WHERE id = ?");
    let group = sqlx::query_as::<_, UserGroup>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(group)
}

/// 사용자가 속한 그룹을 조회합니다. 그룹이 없는 사용자면 `Ok(None)`.
pub async fn get_group_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<UserGroup>, AppError> {
    let sql = format!(
        r#"
        SELECT {GROUP_COLUMNS} FROM user_groups
        WHERE id = (SELECT group_id FROM users WHERE id = ?)
        "#
    );
    let group = sqlx::query_as::<_, UserGroup>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(group)
}

pub async fn create_group(pool: &SqlitePool, req: &UserGroupRequest) -> Result<UserGroup, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO user_groups (
            id, name, admin, super_admin, records, progress_notes, experiences,
            receipts, expenses, schedule, pdf, users, notes
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.name.trim())
    .bind(req.admin)
    .bind(req.super_admin)
    .bind(req.records)
    .bind(req.progress_notes)
    .bind(req.experiences)
    .bind(req.receipts)
    .bind(req.expenses)
    .bind(req.schedule)
    .bind(req.pdf)
    .bind(req.users)
    .bind(&req.notes)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Group name already exists"))?;

    get_group(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created group".to_string()))
}

pub async fn update_group(
    pool: &SqlitePool,
    id: &str,
    req: &UserGroupRequest,
) -> Result<Option<UserGroup>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE user_groups SET
            name = ?, admin = ?, super_admin = ?, records = ?, progress_notes = ?,
            experiences = ?, receipts = ?, expenses = ?, schedule = ?, pdf = ?, users = ?,
            notes = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(req.name.trim())
    .bind(req.admin)
    .bind(req.super_admin)
    .bind(req.records)
    .bind(req.progress_notes)
    .bind(req.experiences)
    .bind(req.receipts)
    .bind(req.expenses)
    .bind(req.schedule)
    .bind(req.pdf)
    .bind(req.users)
    .bind(&req.notes)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Group name already exists"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_group(pool, id).await
}

/// 그룹을 삭제합니다. 소속 사용자의 `group_id`는 NULL이 되어 모든 권한을 잃습니다.
pub async fn delete_group(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM user_groups WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
