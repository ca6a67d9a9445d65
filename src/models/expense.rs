//! # 지출(Expense) 모델
//!
//! 클리닉 운영 지출(임대료, 소모품 등)과 지출 유형을 정의합니다.

use serde::{Deserialize, Serialize};

use super::appointment::parse_date;
use crate::error::AppError;

/// 지출 유형: `expense_types` 테이블 한 행 (예: "Aluguel", "Material")
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpenseType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseTypeRequest {
    pub name: String,
}

impl ExpenseTypeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Expense type name is required".to_string()));
        }
        Ok(())
    }
}

/// 지출 엔티티: 유형 이름을 LEFT JOIN으로 함께 가져옵니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Expense {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub expense_type_id: Option<String>,
    pub expense_type_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseRequest {
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub expense_type_id: Option<String>,
}

impl ExpenseRequest {
    pub fn validated(mut self) -> Result<Self, AppError> {
        self.description = self.description.trim().to_string();
        if self.description.is_empty() {
            return Err(AppError::BadRequest("Description is required".to_string()));
        }
        // NaN/무한대는 is_finite()에서 걸러집니다.
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AppError::BadRequest("Amount must be greater than zero".to_string()));
        }
        self.date = parse_date(&self.date)?.format("%Y-%m-%d").to_string();
        Ok(self)
    }
}

/// `GET /expenses` 쿼리 문자열
///
/// `month`와 `year`는 함께 보낼 때만 월 필터로 적용됩니다.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub expense_type_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64) -> ExpenseRequest {
        ExpenseRequest {
            date: "2024-01-15".to_string(),
            description: "Material de escritório".to_string(),
            amount,
            expense_type_id: None,
        }
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(request(150.5).validated().is_ok());
        assert!(request(0.0).validated().is_err());
        assert!(request(-10.0).validated().is_err());
        assert!(request(f64::NAN).validated().is_err());
    }
}
