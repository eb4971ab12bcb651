//! Request / response types of the polls API

use serde::{Deserialize, Serialize};

use super::error_code::ErrorCode;

/// 错误响应体 `{"code": 3000, "error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub error: String,
}

/// `/polls/{id}/export/` 查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_secs: i64,
    pub response_time_ms: u64,
    pub storage: HealthStorageCheck,
}
