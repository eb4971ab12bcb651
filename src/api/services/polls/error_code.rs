//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::PollError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 投票查询错误
/// - 4000-4099: 统计 / 导出 / 图表错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 投票错误 3000-3099
    PollNotFound = 3000,
    PollHasNoChoices = 3001,
    InvalidListingQuery = 3002,

    // 统计 / 导出 / 图表错误 4000-4099
    StatisticsFailed = 4000,
    ExportFailed = 4001,
    ChartRenderFailed = 4002,
}

impl From<&PollError> for ErrorCode {
    fn from(err: &PollError) -> Self {
        match err {
            PollError::NotFound(_) => ErrorCode::PollNotFound,
            PollError::BadRequest(_) | PollError::Validation(_) => ErrorCode::BadRequest,
            PollError::ChartRender(_) => ErrorCode::ChartRenderFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl From<PollError> for ErrorCode {
    fn from(err: PollError) -> Self {
        ErrorCode::from(&err)
    }
}

// ============ 按接口细化的映射 ============

pub fn statistics_error_code(err: &PollError) -> ErrorCode {
    match err {
        PollError::Internal(_) => ErrorCode::StatisticsFailed,
        other => other.into(),
    }
}

pub fn listing_error_code(err: &PollError) -> ErrorCode {
    match err {
        PollError::BadRequest(_) => ErrorCode::InvalidListingQuery,
        other => other.into(),
    }
}

pub fn export_error_code(err: &PollError) -> ErrorCode {
    match err {
        PollError::NotFound(_) => ErrorCode::PollNotFound,
        PollError::BadRequest(_) | PollError::Validation(_) => ErrorCode::BadRequest,
        _ => ErrorCode::ExportFailed,
    }
}

pub fn chart_error_code(err: &PollError) -> ErrorCode {
    match err {
        PollError::BadRequest(_) => ErrorCode::PollHasNoChoices,
        other => other.into(),
    }
}
