//! Polls API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::warn;

use crate::errors::PollError;

use super::error_code::ErrorCode;
use super::types::ApiError;

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiError {
            code,
            error: message.to_string(),
        })
}

/// 从 PollError 构建错误响应（HTTP 状态码取自错误本身）
pub fn error_from_poll(err: &PollError, code: ErrorCode) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        warn!("Request failed: {}", err);
    }
    error_response(status, code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时直接返回 JSON 数据，失败时按 `code_for` 选择错误码。
pub fn api_result<T, F>(result: crate::errors::Result<T>, code_for: F) -> HttpResponse
where
    T: Serialize,
    F: Fn(&PollError) -> ErrorCode,
{
    match result {
        Ok(data) => HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(data),
        Err(err) => error_from_poll(&err, code_for(&err)),
    }
}
