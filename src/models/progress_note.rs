//! # 경과 기록(Progress Note) 모델
//!
//! 상담 한 회기마다 남기는 임상 기록입니다.
//! 시행 절차(procedure), 회기 요약(synthesis), 이후 방침(conduct)은 필수입니다.

use serde::{Deserialize, Serialize};

use super::appointment::parse_date;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressNote {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub date: String,
    pub procedure: String,
    pub synthesis: String,
    pub conduct: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressNoteRequest {
    pub client_id: String,
    pub date: String,
    pub procedure: String,
    pub synthesis: String,
    pub conduct: String,
    pub notes: Option<String>,
}

impl ProgressNoteRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        let required = [
            ("client_id", &self.client_id),
            ("procedure", &self.procedure),
            ("synthesis", &self.synthesis),
            ("conduct", &self.conduct),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::BadRequest(format!("{} is required", field)));
        }
        self.date = parse_date(&self.date)?.format("%Y-%m-%d").to_string();
        Ok(self)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressNoteListQuery {
    pub client_id: Option<String>,
}
