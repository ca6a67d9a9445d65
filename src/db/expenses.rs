//! 지출과 지출 유형 쿼리

use crate::error::{conflict_on_unique, AppError};
use crate::models::*;
use sqlx::SqlitePool;

const EXPENSE_SELECT: &str = r#"
    SELECT e.id, e.date, e.description, e.amount, e.expense_type_id,
           t.name AS expense_type_name, e.created_at, e.updated_at
    FROM expenses e
    LEFT JOIN expense_types t ON t.id = e.expense_type_id
"#;

/// 지출 목록을 날짜 역순으로 조회합니다.
///
/// `month`와 `year`가 모두 있으면 "YYYY-MM" 접두어로 해당 달만 거릅니다.
pub async fn list_expenses(
    pool: &SqlitePool,
    query: &ExpenseListQuery,
) -> Result<Vec<Expense>, AppError> {
    let month_prefix = match (query.month, query.year) {
        (Some(month), Some(year)) => {
            if !(1..=12).contains(&month) {
                return Err(AppError::BadRequest(format!("Invalid month: {}", month)));
            }
            Some(format!("{:04}-{:02}", year, month))
        }
        _ => None,
    };

    let sql = format!(
        r#"{EXPENSE_SELECT}
        WHERE (?1 IS NULL OR substr(e.date, 1, 7) = ?1)
          AND (?2 IS NULL OR e.expense_type_id = ?2)
        ORDER BY e.date DESC, e.created_at DESC
        "#
    );

    let expenses = sqlx::query_as::<_, Expense>(&sql)
        .bind(month_prefix)
        .bind(query.expense_type_id.as_deref())
        .fetch_all(pool)
        .await?;

    Ok(expenses)
}

pub async fn get_expense(pool: &SqlitePool, id: &str) -> Result<Option<Expense>, AppError> {
    let sql = format!("{EXPENSE_SELECT} WHERE e.id = ?");
    let expense = sqlx::query_as::<_, Expense>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(expense)
}

fn unknown_expense_type(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest("Unknown expense type".to_string())
        }
        _ => AppError::Database(err),
    }
}

pub async fn create_expense(pool: &SqlitePool, req: &ExpenseRequest) -> Result<Expense, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        "INSERT INTO expenses (id, date, description, amount, expense_type_id) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.date)
    .bind(&req.description)
    .bind(req.amount)
    .bind(&req.expense_type_id)
    .execute(pool)
    .await
    .map_err(unknown_expense_type)?;

    get_expense(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created expense".to_string()))
}

pub async fn update_expense(
    pool: &SqlitePool,
    id: &str,
    req: &ExpenseRequest,
) -> Result<Option<Expense>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE expenses SET
            date = ?, description = ?, amount = ?, expense_type_id = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&req.date)
    .bind(&req.description)
    .bind(req.amount)
    .bind(&req.expense_type_id)
    .bind(id)
    .execute(pool)
    .await
    .map_err(unknown_expense_type)?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_expense(pool, id).await
}

pub async fn delete_expense(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ── 지출 유형 ──

pub async fn list_expense_types(pool: &SqlitePool) -> Result<Vec<ExpenseType>, AppError> {
    let types = sqlx::query_as::<_, ExpenseType>(
        "SELECT id, name FROM expense_types ORDER BY name COLLATE NOCASE",
    )
    .fetch_all(pool)
    .await?;

    Ok(types)
}

pub async fn get_expense_type(pool: &SqlitePool, id: &str) -> Result<Option<ExpenseType>, AppError> {
    let expense_type =
        sqlx::query_as::<_, ExpenseType>("SELECT id, name FROM expense_types WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(expense_type)
}

pub async fn create_expense_type(
    pool: &SqlitePool,
    req: &ExpenseTypeRequest,
) -> Result<ExpenseType, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO expense_types (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(req.name.trim())
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Expense type already exists"))?;

    get_expense_type(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created expense type".to_string()))
}

pub async fn update_expense_type(
    pool: &SqlitePool,
    id: &str,
    req: &ExpenseTypeRequest,
) -> Result<Option<ExpenseType>, AppError> {
    let result = sqlx::query("UPDATE expense_types SET name = ? WHERE id = ?")
        .bind(req.name.trim())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Expense type already exists"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_expense_type(pool, id).await
}

/// 지출 유형 삭제. 해당 유형의 지출은 남고 `expense_type_id`만 NULL이 됩니다.
pub async fn delete_expense_type(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM expense_types WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
