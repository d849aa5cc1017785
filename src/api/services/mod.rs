pub mod admin;
pub mod auth;
pub mod health;
pub mod public;

use actix_web::http::StatusCode;
use actix_web::web;

use crate::api::constants::JSON_PAYLOAD_LIMIT;

pub use admin::admin_routes;
pub use auth::auth_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use public::uploads_routes;

/// JSON 解析失败时也返回统一信封
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_PAYLOAD_LIMIT)
        .error_handler(|err, _req| {
            let response = admin::error_response(
                StatusCode::BAD_REQUEST,
                admin::ErrorCode::BadRequest,
                &format!("Invalid JSON body: {}", err),
            );
            actix_web::error::InternalError::from_response(err, response).into()
        })
}

/// `/api` 路由
///
/// 包含：
/// - /articles, /genres, /like, /translate - 公开端点
/// - /auth - 管理员会话
/// - /admin - 管理端点（需要认证）
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .app_data(json_config())
        .service(public::articles_routes())
        .route("/genres", web::get().to(public::genres))
        .service(public::like_routes())
        .service(public::translate_routes())
        .service(auth_routes())
        .service(admin_routes())
}
