use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq)]
pub enum PollError {
    NotFound(String),
    BadRequest(String),
    Validation(String),
    Internal(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
    ChartRender(String),
    FileOperation(String),
}

impl PollError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            PollError::NotFound(_) => "E001",
            PollError::BadRequest(_) => "E002",
            PollError::Validation(_) => "E003",
            PollError::Internal(_) => "E004",
            PollError::DatabaseConfig(_) => "E005",
            PollError::DatabaseConnection(_) => "E006",
            PollError::DatabaseOperation(_) => "E007",
            PollError::Serialization(_) => "E008",
            PollError::ChartRender(_) => "E009",
            PollError::FileOperation(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            PollError::NotFound(_) => "Resource Not Found",
            PollError::BadRequest(_) => "Bad Request",
            PollError::Validation(_) => "Validation Error",
            PollError::Internal(_) => "Internal Error",
            PollError::DatabaseConfig(_) => "Database Configuration Error",
            PollError::DatabaseConnection(_) => "Database Connection Error",
            PollError::DatabaseOperation(_) => "Database Operation Error",
            PollError::Serialization(_) => "Serialization Error",
            PollError::ChartRender(_) => "Chart Render Error",
            PollError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            PollError::NotFound(msg)
            | PollError::BadRequest(msg)
            | PollError::Validation(msg)
            | PollError::Internal(msg)
            | PollError::DatabaseConfig(msg)
            | PollError::DatabaseConnection(msg)
            | PollError::DatabaseOperation(msg)
            | PollError::Serialization(msg)
            | PollError::ChartRender(msg)
            | PollError::FileOperation(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            PollError::NotFound(_) => StatusCode::NOT_FOUND,
            PollError::BadRequest(_) | PollError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PollError {}

// 便捷的构造函数
impl PollError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        PollError::NotFound(msg.into())
    }

    pub fn bad_request<T: Into<String>>(msg: T) -> Self {
        PollError::BadRequest(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        PollError::Validation(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        PollError::Internal(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        PollError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        PollError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        PollError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        PollError::Serialization(msg.into())
    }

    pub fn chart_render<T: Into<String>>(msg: T) -> Self {
        PollError::ChartRender(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        PollError::FileOperation(msg.into())
    }

    /// 找不到指定 ID 的投票
    pub fn poll_not_found(poll_id: i64) -> Self {
        PollError::NotFound(format!("Poll {} not found", poll_id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PollError::NotFound(_))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for PollError {
    fn from(err: sea_orm::DbErr) -> Self {
        PollError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for PollError {
    fn from(err: std::io::Error) -> Self {
        PollError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PollError {
    fn from(err: serde_json::Error) -> Self {
        PollError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for PollError {
    fn from(err: csv::Error) -> Self {
        PollError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            PollError::poll_not_found(7).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PollError::bad_request("no choices").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PollError::validation("empty").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PollError::internal("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PollError::database_operation("locked").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            PollError::not_found(""),
            PollError::bad_request(""),
            PollError::validation(""),
            PollError::internal(""),
            PollError::database_config(""),
            PollError::database_connection(""),
            PollError::database_operation(""),
            PollError::serialization(""),
            PollError::chart_render(""),
            PollError::file_operation(""),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = PollError::poll_not_found(42);
        assert_eq!(err.to_string(), "Resource Not Found: Poll 42 not found");
        assert_eq!(err.message(), "Poll 42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_db_err() {
        let err: PollError = sea_orm::DbErr::Custom("disk full".to_string()).into();
        assert_eq!(err.code(), "E007");
        assert!(err.message().contains("disk full"));
    }
}
