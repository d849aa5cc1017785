use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum BlogError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    Serialization(String),
    PayloadTooLarge(String),
    UnsupportedMedia(String),
    InvalidMultipartData(String),
    ExternalService(String),
    ServiceUnavailable(String),
}

impl BlogError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BlogError::DatabaseConfig(_) => "E001",
            BlogError::DatabaseConnection(_) => "E002",
            BlogError::DatabaseOperation(_) => "E003",
            BlogError::FileOperation(_) => "E004",
            BlogError::Validation(_) => "E005",
            BlogError::NotFound(_) => "E006",
            BlogError::Unauthorized(_) => "E007",
            BlogError::Forbidden(_) => "E008",
            BlogError::Conflict(_) => "E009",
            BlogError::Serialization(_) => "E010",
            BlogError::PayloadTooLarge(_) => "E011",
            BlogError::UnsupportedMedia(_) => "E012",
            BlogError::InvalidMultipartData(_) => "E013",
            BlogError::ExternalService(_) => "E014",
            BlogError::ServiceUnavailable(_) => "E015",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BlogError::DatabaseConfig(_) => "Database Configuration Error",
            BlogError::DatabaseConnection(_) => "Database Connection Error",
            BlogError::DatabaseOperation(_) => "Database Operation Error",
            BlogError::FileOperation(_) => "File Operation Error",
            BlogError::Validation(_) => "Validation Error",
            BlogError::NotFound(_) => "Resource Not Found",
            BlogError::Unauthorized(_) => "Unauthorized",
            BlogError::Forbidden(_) => "Forbidden",
            BlogError::Conflict(_) => "Conflict",
            BlogError::Serialization(_) => "Serialization Error",
            BlogError::PayloadTooLarge(_) => "Payload Too Large",
            BlogError::UnsupportedMedia(_) => "Unsupported Media Type",
            BlogError::InvalidMultipartData(_) => "Invalid Multipart Data",
            BlogError::ExternalService(_) => "External Service Error",
            BlogError::ServiceUnavailable(_) => "Service Unavailable",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BlogError::DatabaseConfig(msg) => msg,
            BlogError::DatabaseConnection(msg) => msg,
            BlogError::DatabaseOperation(msg) => msg,
            BlogError::FileOperation(msg) => msg,
            BlogError::Validation(msg) => msg,
            BlogError::NotFound(msg) => msg,
            BlogError::Unauthorized(msg) => msg,
            BlogError::Forbidden(msg) => msg,
            BlogError::Conflict(msg) => msg,
            BlogError::Serialization(msg) => msg,
            BlogError::PayloadTooLarge(msg) => msg,
            BlogError::UnsupportedMedia(msg) => msg,
            BlogError::InvalidMultipartData(msg) => msg,
            BlogError::ExternalService(msg) => msg,
            BlogError::ServiceUnavailable(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            BlogError::Validation(_) | BlogError::InvalidMultipartData(_) => {
                StatusCode::BAD_REQUEST
            }
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BlogError::Forbidden(_) => StatusCode::FORBIDDEN,
            BlogError::Conflict(_) => StatusCode::CONFLICT,
            BlogError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            BlogError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            BlogError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            BlogError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            BlogError::DatabaseConfig(_)
            | BlogError::DatabaseConnection(_)
            | BlogError::DatabaseOperation(_)
            | BlogError::FileOperation(_)
            | BlogError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
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

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BlogError {}

// 便捷的构造函数
impl BlogError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        BlogError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        BlogError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        BlogError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        BlogError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BlogError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BlogError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        BlogError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        BlogError::Forbidden(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        BlogError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BlogError::Serialization(msg.into())
    }

    pub fn payload_too_large<T: Into<String>>(msg: T) -> Self {
        BlogError::PayloadTooLarge(msg.into())
    }

    pub fn unsupported_media<T: Into<String>>(msg: T) -> Self {
        BlogError::UnsupportedMedia(msg.into())
    }

    pub fn invalid_multipart_data<T: Into<String>>(msg: T) -> Self {
        BlogError::InvalidMultipartData(msg.into())
    }

    pub fn external_service<T: Into<String>>(msg: T) -> Self {
        BlogError::ExternalService(msg.into())
    }

    pub fn service_unavailable<T: Into<String>>(msg: T) -> Self {
        BlogError::ServiceUnavailable(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BlogError {
    fn from(err: sea_orm::DbErr) -> Self {
        BlogError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for BlogError {
    fn from(err: std::io::Error) -> Self {
        BlogError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BlogError {
    fn from(err: serde_json::Error) -> Self {
        BlogError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for BlogError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BlogError::Unauthorized(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
