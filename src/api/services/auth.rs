//! 管理员会话端点（OAuth 2.0 授权码流程）
//!
//! - GET  /auth/login     跳转到身份提供方
//! - GET  /auth/callback  校验 state，换取用户信息，签发会话 Cookie
//! - POST /auth/logout    清除会话
//! - GET  /auth/session   当前会话信息

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, error, info, warn};

use crate::api::constants;
use crate::api::jwt::{SessionClaims, get_jwt_service};
use crate::config::get_config;
use crate::services::IdentityProvider;
use crate::utils::generate_secure_token;

use super::admin::{
    CookieBuilder, ErrorCode, MessageResponse, SessionResponse, error_from_blog, error_response,
    json_response, success_response,
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn admin_disabled_response() -> HttpResponse {
    debug!("Admin email not configured - auth endpoints disabled");
    error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, "Not Found")
}

/// 常量时间比较两个 state
fn state_matches(expected: &str, received: &str) -> bool {
    !expected.is_empty() && bool::from(expected.as_bytes().ct_eq(received.as_bytes()))
}

/// 从 Bearer 或 Cookie 中取出并校验当前管理员会话
fn current_session(req: &HttpRequest) -> Option<SessionClaims> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .or_else(|| {
            req.cookie(constants::SESSION_COOKIE_NAME)
                .map(|c| c.value().to_string())
        })?;

    let claims = get_jwt_service().validate_session(&token).ok()?;
    get_config()
        .auth
        .is_admin_email(&claims.sub)
        .then_some(claims)
}

/// 开始登录：生成 state 并跳转到提供方
pub async fn login(identity: web::Data<Arc<dyn IdentityProvider>>) -> ActixResult<impl Responder> {
    if !get_config().auth.admin_enabled() {
        return Ok(admin_disabled_response());
    }

    let state = generate_secure_token(32);
    let authorize_url = match identity.authorize_url(&state) {
        Ok(url) => url,
        Err(e) => {
            error!("OAuth login unavailable: {}", e);
            return Ok(error_from_blog(&e));
        }
    };

    let cookie_builder = CookieBuilder::from_config();
    Ok(HttpResponse::Found()
        .cookie(cookie_builder.build_state_cookie(state))
        .insert_header((LOCATION, authorize_url))
        .finish())
}

/// OAuth 回调
pub async fn callback(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
    identity: web::Data<Arc<dyn IdentityProvider>>,
) -> ActixResult<impl Responder> {
    let config = get_config();
    if !config.auth.admin_enabled() {
        return Ok(admin_disabled_response());
    }

    let cookie_builder = CookieBuilder::from_config();
    let query = query.into_inner();

    let expected_state = req
        .cookie(constants::OAUTH_STATE_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .unwrap_or_default();
    let received_state = query.state.unwrap_or_default();

    if !state_matches(&expected_state, &received_state) {
        warn!("OAuth callback rejected: state mismatch");
        let mut response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::OAuthStateMismatch,
            "Invalid OAuth state.",
        );
        response.add_cookie(&cookie_builder.build_expired_state_cookie())?;
        return Ok(response);
    }

    if let Some(provider_error) = query.error {
        warn!("OAuth provider returned error: {}", provider_error);
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::AuthFailed,
            &format!("OAuth error: {}", provider_error),
        ));
    }

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::AuthFailed,
            "Missing authorization code.",
        ));
    };

    let user = match identity.exchange(&code).await {
        Ok(user) => user,
        Err(e) => {
            error!("OAuth code exchange failed: {}", e);
            return Ok(error_response(
                e.http_status(),
                ErrorCode::OAuthProviderError,
                e.message(),
            ));
        }
    };

    if !user.email_verified || !config.auth.is_admin_email(&user.email) {
        warn!(
            "Rejected admin login for {} (verified: {})",
            user.email, user.email_verified
        );
        let mut response = error_response(StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Forbidden");
        response.add_cookie(&cookie_builder.build_expired_state_cookie())?;
        return Ok(response);
    }

    let (token, _claims) = match get_jwt_service().issue_session(&user.email, user.name.as_deref())
    {
        Ok(issued) => issued,
        Err(e) => {
            error!("Failed to issue session token: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to create session.",
            ));
        }
    };

    info!("Admin login successful: {}", user.email);

    Ok(HttpResponse::Found()
        .cookie(cookie_builder.build_session_cookie(token))
        .cookie(cookie_builder.build_expired_state_cookie())
        .insert_header((LOCATION, config.auth.post_login_redirect.clone()))
        .finish())
}

/// 登出 - 清除会话 Cookie
pub async fn logout(_req: HttpRequest) -> ActixResult<impl Responder> {
    info!("Admin logout");

    let cookie_builder = CookieBuilder::from_config();
    let mut response = json_response(
        StatusCode::OK,
        ErrorCode::Success,
        "Logout successful",
        Some(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    );
    response.add_cookie(&cookie_builder.build_expired_session_cookie())?;
    Ok(response)
}

/// 当前会话
pub async fn session(req: HttpRequest) -> ActixResult<impl Responder> {
    let Some(claims) = current_session(&req) else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized",
        ));
    };

    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default();

    Ok(success_response(SessionResponse {
        email: claims.sub,
        name: claims.name,
        expires_at,
    }))
}

/// 认证路由 `/auth`
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/login", web::get().to(login))
        .route("/callback", web::get().to(callback))
        .route("/logout", web::post().to(logout))
        .route("/session", web::get().to(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_matches() {
        assert!(state_matches("abc", "abc"));
        assert!(!state_matches("abc", "abd"));
        assert!(!state_matches("abc", "ab"));
        assert!(!state_matches("", ""));
    }
}
