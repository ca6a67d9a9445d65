//! # 상담 경험(Experience) 모델
//!
//! 내담자가 회기에서 겪은 긍정적/부정적 경험을 짧게 기록합니다.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Experience {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub positive: Option<String>,
    pub negative: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceRequest {
    pub client_id: String,
    pub positive: Option<String>,
    pub negative: Option<String>,
}

impl ExperienceRequest {
    /// 긍정/부정 중 최소 하나는 내용이 있어야 합니다.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.client_id.trim().is_empty() {
            return Err(AppError::BadRequest("client_id is required".to_string()));
        }
        let has_text = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !has_text(&self.positive) && !has_text(&self.negative) {
            return Err(AppError::BadRequest(
                "At least one of positive or negative must be filled in".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExperienceListQuery {
    pub client_id: Option<String>,
    /// 내담자 이름/긍정/부정 내용 부분 일치
    pub search: Option<String>,
}
