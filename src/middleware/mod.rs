//! # 미들웨어 모듈
//!
//! - `auth`: JWT 인증 Extractor와 그룹 권한 게이트

pub mod auth;
