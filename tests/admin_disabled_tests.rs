//! With no admin email configured the admin surface behaves as if it did not exist

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use tempfile::TempDir;

use inkpost::api::services::{AppStartTime, api_routes, health_routes};
use inkpost::config::{StaticConfig, update_config};
use inkpost::errors::{BlogError, Result};
use inkpost::services::{ArticleService, IdentityProvider, IdentityUser};
use inkpost::storage::SeaOrmStorage;

static INIT: Once = Once::new();

struct PanicProvider;

#[async_trait]
impl IdentityProvider for PanicProvider {
    fn authorize_url(&self, _state: &str) -> Result<String> {
        panic!("login must not reach the provider when admin is disabled")
    }

    async fn exchange(&self, _code: &str) -> Result<IdentityUser> {
        Err(BlogError::service_unavailable("unused"))
    }
}

#[actix_rt::test]
async fn test_admin_and_login_are_not_found() {
    INIT.call_once(|| {
        let mut config = StaticConfig::default();
        config.auth.admin_email = String::new();
        update_config(config);
    });

    let temp_dir = TempDir::new().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("disabled.db").display()
    );
    let storage = Arc::new(SeaOrmStorage::new(&db_url, "sqlite").await.unwrap());
    let identity: Arc<dyn IdentityProvider> = Arc::new(PanicProvider);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(Arc::new(ArticleService::new(storage.clone()))))
            .app_data(web::Data::new(identity))
            .app_data(web::Data::new(AppStartTime {
                start_datetime: chrono::Utc::now(),
            }))
            .service(api_routes())
            .service(health_routes()),
    )
    .await;

    for uri in ["/api/admin/articles", "/api/admin/genres", "/api/auth/login"] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    // 公开端点与健康检查不受影响
    let req = TestRequest::get().uri("/api/articles").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get().uri("/health/live").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = TestRequest::get().uri("/health/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "OK");

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["checks"]["storage"]["articles_count"], 0);
    assert_eq!(
        body["data"]["checks"]["storage"]["backend"]["storage_type"],
        "sqlite"
    );
}
