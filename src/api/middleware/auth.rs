use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

use crate::api::constants;
use crate::api::jwt::{SessionClaims, get_jwt_service};
use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::config::get_config;

/// Admin authentication middleware
///
/// 每个请求都重新校验 token，并要求 subject 等于当前配置的管理员邮箱。
#[derive(Clone)]
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    /// Handle requests when no admin email is configured
    fn handle_admin_disabled(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        debug!("Admin email not configured - returning 404");
        req.into_response(
            HttpResponse::NotFound()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .body("Not Found")
                .map_into_right_body(),
        )
    }

    /// Handle unauthorized requests
    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!("Admin authentication failed for {}", req.path());
        req.into_response(
            HttpResponse::Unauthorized()
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    }

    /// 校验 token 并确认 subject 是管理员
    fn authorize_token(token: &str, source: &str) -> Option<SessionClaims> {
        let claims = match get_jwt_service().validate_session(token) {
            Ok(claims) => claims,
            Err(e) => {
                info!("{} token validation failed: {}", source, e);
                return None;
            }
        };

        if !get_config().auth.is_admin_email(&claims.sub) {
            warn!("{} token for non-admin subject rejected: {}", source, claims.sub);
            return None;
        }

        trace!("{} token validation successful", source);
        Some(claims)
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // 每次请求都读取最新配置
            if !get_config().auth.admin_enabled() {
                return Ok(Self::handle_admin_disabled(req));
            }

            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            // 1. Bearer Token
            if let Some(token) = Self::extract_bearer_token(&req)
                && let Some(claims) = Self::authorize_token(&token, "Bearer")
            {
                req.extensions_mut().insert(claims);
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            // 2. 会话 Cookie
            let cookie_token = req
                .cookie(constants::SESSION_COOKIE_NAME)
                .map(|c| c.value().to_string());
            if let Some(token) = cookie_token
                && let Some(claims) = Self::authorize_token(&token, "Cookie")
            {
                req.extensions_mut().insert(claims);
                let response = srv.call(req).await?.map_into_left_body();
                return Ok(response);
            }

            // 两种认证都失败
            Ok(Self::handle_unauthorized(req))
        })
    }
}
