use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

const NOTE_SELECT: &str = r#"
    SELECT n.id, n.client_id, c.name AS client_name, n.date, n.procedure, n.synthesis,
           n.conduct, n.notes, n.created_at, n.updated_at
    FROM progress_notes n
    JOIN clients c ON c.id = n.client_id
"#;

/// 경과 기록을 최신 날짜부터 조회합니다. `client_id`가 있으면 해당 내담자만.
pub async fn list_progress_notes(
    pool: &SqlitePool,
    client_id: Option<&str>,
) -> Result<Vec<ProgressNote>, AppError> {
    let sql = format!(
        "{NOTE_SELECT} WHERE (?1 IS NULL OR n.client_id = ?1) ORDER BY n.date DESC, n.created_at DESC"
    );
    let notes = sqlx::query_as::<_, ProgressNote>(&sql)
        .bind(client_id)
        .fetch_all(pool)
        .await?;

    Ok(notes)
}

pub async fn get_progress_note(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ProgressNote>, AppError> {
    let sql = format!("{NOTE_SELECT} WHERE n.id = ?");
    let note = sqlx::query_as::<_, ProgressNote>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(note)
}

/// 외래키 위반(존재하지 않는 내담자)을 400으로 바꿉니다.
pub(crate) fn unknown_client(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest("Unknown client".to_string())
        }
        _ => AppError::Database(err),
    }
}

pub async fn create_progress_note(
    pool: &SqlitePool,
    req: &ProgressNoteRequest,
) -> Result<ProgressNote, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO progress_notes (id, client_id, date, procedure, synthesis, conduct, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.client_id)
    .bind(&req.date)
    .bind(&req.procedure)
    .bind(&req.synthesis)
    .bind(&req.conduct)
    .bind(&req.notes)
    .execute(pool)
    .await
    .map_err(unknown_client)?;

    get_progress_note(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created progress note".to_string()))
}

pub async fn update_progress_note(
    pool: &SqlitePool,
    id: &str,
    req: &ProgressNoteRequest,
) -> Result<Option<ProgressNote>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE progress_notes SET
            client_id = ?, date = ?, procedure = ?, synthesis = ?, conduct = ?, notes = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&req.client_id)
    .bind(&req.date)
    .bind(&req.procedure)
    .bind(&req.synthesis)
    .bind(&req.conduct)
    .bind(&req.notes)
    .bind(id)
    .execute(pool)
    .await
    .map_err(unknown_client)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_progress_note(pool, id).await
}

pub async fn delete_progress_note(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM progress_notes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
