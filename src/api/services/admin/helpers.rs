//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::constants;
use crate::config::SameSitePolicy;
use crate::errors::BlogError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建带自定义消息的成功响应
pub fn success_with_message<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    data: T,
) -> HttpResponse {
    json_response(status, ErrorCode::Success, message, Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 BlogError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_blog(err: &BlogError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err.clone());
    if status.is_server_error() {
        tracing::error!("{}", err.format_simple());
    }
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 BlogError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<BlogError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: BlogError = e.into();
            error_from_blog(&err)
        }
    }
}

/// 区分 "字段缺失" 与 "字段为 null"：缺失由 `#[serde(default)]` 给出 `None`，
/// 出现时（包括 null）包一层 `Some`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// 只接受 JSON 布尔值，其他类型一律视为缺失
pub fn bool_or_none<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool())
}

/// Cookie 构建器，消除重复的 cookie 创建代码
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    session_hours: u64,
}

impl CookieBuilder {
    pub fn from_config() -> Self {
        let config = crate::config::get_config();

        let same_site = match config.auth.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: config.auth.cookie_secure,
            domain: config.auth.cookie_domain.clone(),
            session_hours: config.auth.session_hours,
        }
    }

    /// 基础 cookie 构建方法，消除重复代码
    fn build_cookie_base(
        &self,
        name: &str,
        value: String,
        same_site: SameSite,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::SESSION_COOKIE_NAME,
            token,
            self.same_site,
            actix_web::cookie::time::Duration::hours(self.session_hours as i64),
        )
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::SESSION_COOKIE_NAME,
            String::new(),
            self.same_site,
            actix_web::cookie::time::Duration::ZERO,
        )
    }

    /// OAuth state cookie，必须在提供方重定向回来时随顶级导航发送，固定使用 Lax
    pub fn build_state_cookie(&self, state: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::OAUTH_STATE_COOKIE_NAME,
            state,
            SameSite::Lax,
            actix_web::cookie::time::Duration::minutes(constants::OAUTH_STATE_MINUTES),
        )
    }

    pub fn build_expired_state_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::OAUTH_STATE_COOKIE_NAME,
            String::new(),
            SameSite::Lax,
            actix_web::cookie::time::Duration::ZERO,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = success_response("success_data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response() {
        let response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Something went wrong",
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_from_blog_maps_status() {
        let response = error_from_blog(&BlogError::conflict("taken"));
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = error_from_blog(&BlogError::external_service("down"));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_api_result() {
        let ok: Result<&str, BlogError> = Ok("fine");
        assert_eq!(api_result(ok).status(), StatusCode::OK);

        let err: Result<&str, BlogError> = Err(BlogError::not_found("gone"));
        assert_eq!(api_result(err).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let builder = CookieBuilder {
            same_site: SameSite::Strict,
            secure: true,
            domain: None,
            session_hours: 24,
        };

        let cookie = builder.build_session_cookie("tok".to_string());
        assert_eq!(cookie.name(), constants::SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::hours(24))
        );

        let expired = builder.build_expired_session_cookie();
        assert_eq!(expired.value(), "");
        assert_eq!(
            expired.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );

        let state = builder.build_state_cookie("s".to_string());
        assert_eq!(state.same_site(), Some(SameSite::Lax));
    }
}
