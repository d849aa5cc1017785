use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::api::services::admin::{
    ApiResponse, ErrorCode, HealthChecks, HealthResponse, HealthStorageBackend, HealthStorageCheck,
};
use crate::storage::SeaOrmStorage;

/// 存储检查超时
const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 秒数 → "1d 2h 3m 4s"
fn format_uptime(total_seconds: i64) -> String {
    let total = total_seconds.max(0);
    let (days, rem) = (total / 86_400, total % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, seconds) = (rem / 60, rem % 60);

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Health Service
///
/// 直接调用 storage 的 count，不经过业务 service：探针需要快速响应，
/// 也不应依赖业务逻辑。
pub struct HealthService;

impl HealthService {
    /// 存储检查（只查 count，不加载全表）
    async fn check_storage(storage: &SeaOrmStorage) -> HealthStorageCheck {
        let backend = HealthStorageBackend {
            storage_type: storage.get_backend_config().storage_type,
        };

        match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, storage.count()).await {
            Ok(Ok(count)) => {
                trace!("Storage health check passed, {} articles found", count);
                HealthStorageCheck {
                    status: "healthy".to_string(),
                    articles_count: Some(count),
                    backend,
                    error: None,
                }
            }
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    articles_count: None,
                    backend,
                    error: Some(format!("database error: {}", e)),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    articles_count: None,
                    backend,
                    error: Some("timeout".to_string()),
                }
            }
        }
    }

    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage_status = Self::check_storage(&storage).await;
        let is_healthy = storage_status.status == "healthy";

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0);

        let health_data = HealthResponse {
            status: storage_status.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds as u32,
            checks: HealthChecks {
                storage: storage_status,
            },
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        let (status, code, message) = if is_healthy {
            (StatusCode::OK, ErrorCode::Success, "OK")
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
            )
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}",
            start_time.elapsed(),
            health_data.status,
            format_uptime(uptime_seconds)
        );

        HttpResponse::build(status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                code: code as i32,
                message: message.to_string(),
                data: Some(health_data),
            })
    }

    /// 就绪检查：数据库可达才返回 200
    pub async fn readiness_check(storage: web::Data<Arc<SeaOrmStorage>>) -> impl Responder {
        trace!("Received readiness check request");

        let check = Self::check_storage(&storage).await;
        let status = if check.status == "healthy" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        HttpResponse::build(status)
            .append_header(("Content-Type", "text/plain"))
            .body(if status.is_success() { "OK" } else { "NOT READY" })
    }

    // 活跃性检查，进程存活即可
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
