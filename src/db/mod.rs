//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `appointments`: 상담 일정 CRUD, 기간 조회, 월간 일정 저장
//! - `audit`: 감사 로그 기록과 조회
//! - `clients`: 내담자/내담자 유형 CRUD, 반복 규칙 조회
//! - `dashboard`: 대시보드 집계
//! - `expenses`: 지출/지출 유형 CRUD
//! - `experiences`: 경험 기록 CRUD
//! - `groups`: 사용자 그룹(권한) CRUD
//! - `progress_notes`: 경과 기록 CRUD
//! - `users`: 사용자와 리프레시 토큰

pub mod appointments;
pub mod audit;
pub mod clients;
pub mod dashboard;
pub mod expenses;
pub mod experiences;
pub mod groups;
pub mod progress_notes;
pub mod users;

// 하위 모듈의 공개 함수를 재공개하여 `crate::db::list_clients`처럼 바로 접근할 수 있게 합니다.
// `users`는 이름이 겹치기 쉬워 `db::users::...`로만 접근합니다.
pub use appointments::*;
pub use audit::*;
pub use clients::*;
pub use dashboard::*;
pub use expenses::*;
pub use experiences::*;
pub use groups::*;
pub use progress_notes::*;
