use crate::db::progress_notes::unknown_client;
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

const EXPERIENCE_SELECT: &str = r#"
    SELECT e.id, e.client_id, c.name AS client_name, e.positive, e.negative,
           e.created_at, e.updated_at
    FROM experiences e
    JOIN clients c ON c.id = e.client_id
"#;

/// 경험 기록을 최신순으로 조회합니다.
///
/// `search`는 내담자 이름, 긍정/부정 내용에 대한 대소문자 무시 부분 일치입니다.
pub async fn list_experiences(
    pool: &SqlitePool,
    query: &ExperienceListQuery,
) -> Result<Vec<Experience>, AppError> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let sql = format!(
        r#"{EXPERIENCE_SELECT}
        WHERE (?1 IS NULL OR e.client_id = ?1)
          AND (?2 IS NULL
               OR lower(c.name) LIKE '%' || ?2 || '%'
               OR lower(coalesce(e.positive, '')) LIKE '%' || ?2 || '%'
               OR lower(coalesce(e.negative, '')) LIKE '%' || ?2 || '%')
        ORDER BY e.created_at DESC
        "#
    );

    let experiences = sqlx::query_as::<_, Experience>(&sql)
        .bind(query.client_id.as_deref())
        .bind(search)
        .fetch_all(pool)
        .await?;

    Ok(experiences)
}

pub async fn get_experience(pool: &SqlitePool, id: &str) -> Result<Option<Experience>, AppError> {
    let sql = format!("{EXPERIENCE_SELECT} WHERE e.id = ?");
    let experience = sqlx::query_as::<_, Experience>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(experience)
}

pub async fn create_experience(
    pool: &SqlitePool,
    req: &ExperienceRequest,
) -> Result<Experience, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO experiences (id, client_id, positive, negative) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&req.client_id)
        .bind(&req.positive)
        .bind(&req.negative)
        .execute(pool)
        .await
        .map_err(unknown_client)?;

    get_experience(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created experience".to_string()))
}

pub async fn update_experience(
    pool: &SqlitePool,
    id: &str,
    req: &ExperienceRequest,
) -> Result<Option<Experience>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE experiences SET
            client_id = ?, positive = ?, negative = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&req.client_id)
    .bind(&req.positive)
    .bind(&req.negative)
    .bind(id)
    .execute(pool)
    .await
    .map_err(unknown_client)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_experience(pool, id).await
}

pub async fn delete_experience(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM experiences WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
