//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::BlogError;

use super::types::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 文章错误
/// - 4000-4099: 上传错误
/// - 5000-5099: 翻译错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    DatabaseError = 1006,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    OAuthStateMismatch = 2003,
    RateLimitExceeded = 2004,
    OAuthProviderError = 2005,

    // 文章错误 3000-3099
    ArticleNotFound = 3000,
    SlugConflict = 3001,
    ArticleValidation = 3002,
    AnonymousIdMissing = 3003,
    AnonymousIdInvalid = 3004,

    // 上传错误 4000-4099
    NoFileUploaded = 4000,
    FileTooLarge = 4001,
    UnsupportedMediaType = 4002,
    InvalidMultipartData = 4003,
    UploadFailed = 4004,

    // 翻译错误 5000-5099
    TranslateInvalidRequest = 5000,
    TranslateFailed = 5001,
    TranslateUnavailable = 5002,
}

impl From<BlogError> for ErrorCode {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::Validation(_) => ErrorCode::BadRequest,
            BlogError::NotFound(_) => ErrorCode::NotFound,
            BlogError::Unauthorized(_) => ErrorCode::Unauthorized,
            BlogError::Forbidden(_) => ErrorCode::Forbidden,
            BlogError::Conflict(_) => ErrorCode::SlugConflict,
            BlogError::PayloadTooLarge(_) => ErrorCode::FileTooLarge,
            BlogError::UnsupportedMedia(_) => ErrorCode::UnsupportedMediaType,
            BlogError::InvalidMultipartData(_) => ErrorCode::InvalidMultipartData,
            BlogError::ExternalService(_) => ErrorCode::InternalServerError,
            BlogError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
            BlogError::DatabaseConfig(_)
            | BlogError::DatabaseConnection(_)
            | BlogError::DatabaseOperation(_) => ErrorCode::DatabaseError,
            BlogError::FileOperation(_) | BlogError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
