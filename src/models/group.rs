//! # 사용자 그룹(User Group) 모델
//!
//! 그룹은 메뉴/기능별 권한 플래그 묶음입니다.
//! 사용자는 그룹 하나에 속하고, 라우트 핸들러는 `Permission`으로 권한을 확인합니다.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// 사용자 그룹: `user_groups` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserGroup {
    pub id: String,
    pub name: String,
    /// 감사 로그 조회 등 관리 기능
    pub admin: bool,
    /// 모든 권한 검사를 통과
    pub super_admin: bool,
    /// 내담자/내담자 유형 등록
    pub records: bool,
    pub progress_notes: bool,
    pub experiences: bool,
    /// 수납: 대시보드의 매출/지출 금액
    pub receipts: bool,
    pub expenses: bool,
    /// 상담 일정과 월간 일정 생성
    pub schedule: bool,
    /// PDF 내보내기 (화면 측 기능, 플래그만 보관)
    pub pdf: bool,
    /// 사용자/그룹 관리
    pub users: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 권한 검사에 쓰는 기능 단위
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Admin,
    Records,
    ProgressNotes,
    Experiences,
    Receipts,
    Expenses,
    Schedule,
    Users,
}

impl Permission {
    pub fn name(self) -> &'static str {
        match self {
            Permission::Admin => "admin",
            Permission::Records => "records",
            Permission::ProgressNotes => "progress_notes",
            Permission::Experiences => "experiences",
            Permission::Receipts => "receipts",
            Permission::Expenses => "expenses",
            Permission::Schedule => "schedule",
            Permission::Users => "users",
        }
    }
}

impl UserGroup {
    /// 그룹이 해당 기능 권한을 가지는지 확인합니다. `super_admin`은 항상 true입니다.
    pub fn allows(&self, permission: Permission) -> bool {
        if self.super_admin {
            return true;
        }
        match permission {
            Permission::Admin => self.admin,
            Permission::Records => self.records,
            Permission::ProgressNotes => self.progress_notes,
            Permission::Experiences => self.experiences,
            Permission::Receipts => self.receipts,
            Permission::Expenses => self.expenses,
            Permission::Schedule => self.schedule,
            Permission::Users => self.users,
        }
    }
}

/// 그룹 생성(`POST`)/수정(`PUT`) 요청 본문. 빠진 플래그는 false입니다.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserGroupRequest {
    pub name: String,
    pub admin: bool,
    pub super_admin: bool,
    pub records: bool,
    pub progress_notes: bool,
    pub experiences: bool,
    pub receipts: bool,
    pub expenses: bool,
    pub schedule: bool,
    pub pdf: bool,
    pub users: bool,
    pub notes: Option<String>,
}

impl UserGroupRequest {
    /// 모든 권한을 가진 "Administrator" 그룹 (첫 실행 시 관리자 계정용)
    pub fn administrator() -> Self {
        Self {
            name: "Administrator".to_string(),
            admin: true,
            super_admin: true,
            records: true,
            progress_notes: true,
            experiences: true,
            receipts: true,
            expenses: true,
            schedule: true,
            pdf: true,
            users: true,
            notes: Some("Full access".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Group name is required".to_string()));
        }
        Ok(())
    }
}
