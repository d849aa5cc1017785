//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::{RequestIdMiddleware, TimingMiddleware};
use crate::api::services::{AppStartTime, api_routes, health_routes, uploads_routes};
use crate::config::CorsConfig;
use crate::runtime::lifetime;

/// 跨域允许的方法
const CORS_ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];

/// 跨域允许的请求头
const CORS_ALLOWED_HEADERS: [&str; 3] = ["Content-Type", "Authorization", "Accept"];

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Set allowed_origins explicitly or use '[\"*\"]' for any origin."
        );
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors_config.allow_credentials {
        tracing::error!(
            "SECURITY WARNING: allow_any_origin + allow_credentials is a dangerous combination! \
            Any website can make authenticated cross-origin requests. \
            Disabling credentials for safety."
        );
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 未启用时使用浏览器默认的同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default();
    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    let methods: Vec<actix_web::http::Method> = CORS_ALLOWED_METHODS
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allowed_methods(methods);

    for header in CORS_ALLOWED_HEADERS {
        cors = cors.allowed_header(header);
    }

    cors = cors.max_age(cors_config.max_age as usize);

    // actix-cors 在 any_origin 下会回显 Origin，此时不能携带凭证
    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares server components (storage, services, integrations)
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    if config.server.trusted_proxies.is_empty() {
        warn!(
            "Rate limiting: Auto-detect mode enabled. \
             Connections from private IPs will use X-Forwarded-For. \
             To disable, configure server.trusted_proxies explicitly."
        );
    } else {
        warn!(
            "Rate limiting: Explicit trusted proxies configured: {:?}",
            config.server.trusted_proxies
        );
    }

    // HttpServer 闭包会接管 storage，提前拿到关闭用的连接
    let db_for_shutdown = startup.storage.get_db().clone();

    let storage = startup.storage;
    let article_service = startup.article_service;
    let like_service = startup.like_service;
    let translator = startup.translator;
    let object_store = startup.object_store;
    let local_store = startup.local_store;
    let identity = startup.identity;

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(TimingMiddleware) // 最外层，记录请求延迟
            .wrap(RequestIdMiddleware) // 为每个请求生成 request_id
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(article_service.clone()))
            .app_data(web::Data::new(like_service.clone()))
            .app_data(web::Data::new(translator.clone()))
            .app_data(web::Data::new(object_store.clone()))
            .app_data(web::Data::new(local_store.clone()))
            .app_data(web::Data::new(identity.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .service(api_routes())
            .service(uploads_routes())
            .service(health_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
