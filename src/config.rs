//! # 애플리케이션 설정(Configuration) 모듈
//!
//! `.env` 파일이나 시스템 환경변수에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소와 포트
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 정적 파일 디렉토리
//! - `ADMIN_LOGIN`, `ADMIN_PASSWORD`, `ADMIN_EMAIL`: 첫 실행 시 만들 관리자 계정

use std::env;

/// 첫 실행 시 생성할 관리자 계정 정보
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub login: String,
    pub password: String,
    pub email: String,
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 한 번 읽어온 후 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/gestaopsi.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 프론트엔드 빌드 결과물 경로 (기본값: "../frontend/dist")
    pub frontend_dist: String,
    /// ADMIN_LOGIN과 ADMIN_PASSWORD가 모두 있을 때만 Some
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        // 관리자 계정은 로그인과 비밀번호가 모두 있어야 의미가 있습니다.
        // .ok()로 Result → Option 변환 후, 튜플 매칭으로 둘 다 있는 경우만 골라냅니다.
        let admin = match (env::var("ADMIN_LOGIN").ok(), env::var("ADMIN_PASSWORD").ok()) {
            (Some(login), Some(password)) => Some(AdminBootstrap {
                email: env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{}@localhost", login)),
                login,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            admin,
        })
    }
}
