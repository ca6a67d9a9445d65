//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! 인증 없이 호출할 수 있으며, 로드밸런서나 컨테이너 헬스체크에서 사용합니다.

use axum::Json;
use serde_json::{json, Value};

/// `GET /health`: 서버 상태를 확인합니다. 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}
