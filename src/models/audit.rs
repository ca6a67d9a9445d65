//! # 감사 로그(Audit Log) 모델
//!
//! 누가 언제 어떤 모듈에서 무엇을 했는지 남기는 읽기 전용 기록입니다.

use serde::{Deserialize, Serialize};

/// 한 페이지에 보여줄 로그 수
pub const AUDIT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    Create,
    Update,
    Delete,
    Generate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AuditLevel {
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub action: AuditAction,
    /// 엔티티 모듈 이름 (예: "clients", "appointments")
    pub module: String,
    pub description: String,
    pub level: AuditLevel,
    pub created_at: String,
}

/// 감사 로그 한 줄을 쓰기 위한 입력
#[derive(Debug, Clone)]
pub struct NewAuditLog<'a> {
    pub user_id: Option<&'a str>,
    pub action: AuditAction,
    pub module: &'a str,
    pub description: String,
    pub level: AuditLevel,
}

/// `GET /logs` 쿼리 문자열
///
/// `from`/`to`는 "YYYY-MM-DD" 또는 ISO 8601 시각 접두어로 비교합니다.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    /// 사용자 이름 부분 일치
    pub user: Option<String>,
    pub action: Option<AuditAction>,
    pub module: Option<String>,
    pub level: Option<AuditLevel>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// 1부터 시작
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AuditLogPage {
    pub logs: Vec<AuditLog>,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
}
