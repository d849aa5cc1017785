//! Admin API integration tests
//!
//! Article CRUD, genres and image uploads behind the session check.

use std::sync::{Arc, Once};

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;

use inkpost::api::jwt::get_jwt_service;
use inkpost::api::services::{api_routes, uploads_routes};
use inkpost::config::{StaticConfig, update_config};
use inkpost::errors::{BlogError, Result};
use inkpost::services::{
    ArticleService, IdentityProvider, IdentityUser, LikeService, LocalStore, ObjectStore,
    Translator,
};
use inkpost::storage::SeaOrmStorage;

const ADMIN_EMAIL: &str = "editor@example.com";
const MAX_UPLOAD_BYTES: usize = 1024;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        let mut config = StaticConfig::default();
        config.auth.admin_email = ADMIN_EMAIL.to_string();
        config.auth.jwt_secret = "admin-api-test-secret-0123456789abcdef".to_string();
        config.auth.cookie_secure = false;
        config.uploads.max_file_size = MAX_UPLOAD_BYTES;
        config.uploads.images_only = true;
        update_config(config);
    });
}

fn admin_token() -> String {
    get_jwt_service()
        .issue_session(ADMIN_EMAIL, Some("Editor"))
        .unwrap()
        .0
}

// =============================================================================
// Mocks
// =============================================================================

struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, texts: &[String], _target_language: &str) -> Result<Vec<String>> {
        Ok(texts.to_vec())
    }

    fn name(&self) -> &'static str {
        "Echo"
    }
}

struct NoIdentity;

#[async_trait]
impl IdentityProvider for NoIdentity {
    fn authorize_url(&self, _state: &str) -> Result<String> {
        Err(BlogError::service_unavailable("not configured"))
    }

    async fn exchange(&self, _code: &str) -> Result<IdentityUser> {
        Err(BlogError::service_unavailable("not configured"))
    }
}

// =============================================================================
// Test Setup
// =============================================================================

struct TestEnv {
    storage: Arc<SeaOrmStorage>,
    articles: Arc<ArticleService>,
    likes: Arc<LikeService>,
    local_store: Arc<LocalStore>,
    _dir: TempDir,
}

async fn setup() -> TestEnv {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("admin_api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    let local_store = Arc::new(LocalStore::new(
        temp_dir.path().join("uploads"),
        "/uploads/images",
    ));

    TestEnv {
        articles: Arc::new(ArticleService::new(storage.clone())),
        likes: Arc::new(LikeService::new(storage.clone())),
        storage,
        local_store,
        _dir: temp_dir,
    }
}

macro_rules! init_app {
    ($env:expr) => {{
        let translator: Arc<dyn Translator> = Arc::new(EchoTranslator);
        let identity: Arc<dyn IdentityProvider> = Arc::new(NoIdentity);
        let object_store: Arc<dyn ObjectStore> = $env.local_store.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new($env.storage.clone()))
                .app_data(web::Data::new($env.articles.clone()))
                .app_data(web::Data::new($env.likes.clone()))
                .app_data(web::Data::new(translator))
                .app_data(web::Data::new(identity))
                .app_data(web::Data::new(object_store))
                .app_data(web::Data::new($env.local_store.clone()))
                .service(api_routes())
                .service(uploads_routes()),
        )
        .await
    }};
}

fn authed(req: TestRequest) -> TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {}", admin_token())))
}

fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "----inkpost-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}

// =============================================================================
// Authentication
// =============================================================================

#[actix_rt::test]
async fn test_admin_requires_session() {
    let env = setup().await;
    let app = init_app!(env);

    let req = TestRequest::get().uri("/api/admin/articles").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);

    let req = TestRequest::get()
        .uri("/api/admin/articles")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_admin_rejects_non_admin_subject() {
    let env = setup().await;
    let app = init_app!(env);

    let (token, _) = get_jwt_service()
        .issue_session("someone-else@example.com", None)
        .unwrap();
    let req = TestRequest::get()
        .uri("/api/admin/articles")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_admin_accepts_session_cookie() {
    let env = setup().await;
    let app = init_app!(env);

    let req = TestRequest::get()
        .uri("/api/admin/articles")
        .cookie(actix_web::cookie::Cookie::new(
            "inkpost_session",
            admin_token(),
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// =============================================================================
// Article CRUD
// =============================================================================

#[actix_rt::test]
async fn test_create_get_update_delete_article() {
    let env = setup().await;
    let app = init_app!(env);

    // create
    let req = authed(TestRequest::post().uri("/api/admin/articles"))
        .set_json(json!({
            "title": "First Post",
            "genre": "Rust",
            "content": "# Hello\n\nWorld",
            "thumbnailUrl": "https://cdn.example.com/cover.png"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Article created successfully.");
    assert_eq!(body["data"]["slug"], "first-post");
    assert_eq!(body["data"]["published"], false);
    assert_eq!(body["data"]["likeCount"], 0);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // get
    let req = authed(TestRequest::get().uri(&format!("/api/admin/articles/{}", id))).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["title"], "First Post");
    assert_eq!(body["data"]["content"], "# Hello\n\nWorld");

    // update: publish and clear the thumbnail
    let req = authed(TestRequest::put().uri(&format!("/api/admin/articles/{}", id)))
        .set_json(json!({
            "title": "First Post (edited)",
            "genre": "Rust",
            "content": "Updated",
            "published": true,
            "thumbnailUrl": null
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Article updated successfully.");
    assert_eq!(body["data"]["published"], true);
    assert_eq!(body["data"]["thumbnailUrl"], Value::Null);
    // slug 未提供时保持不变
    assert_eq!(body["data"]["slug"], "first-post");

    // list
    let req = authed(TestRequest::get().uri("/api/admin/articles")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // delete
    let req =
        authed(TestRequest::delete().uri(&format!("/api/admin/articles/{}", id))).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Article deleted successfully.");

    let req = authed(TestRequest::get().uri(&format!("/api/admin/articles/{}", id))).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_create_article_validation() {
    let env = setup().await;
    let app = init_app!(env);

    let req = authed(TestRequest::post().uri("/api/admin/articles"))
        .set_json(json!({ "title": "No body", "genre": "Rust" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Title, genre, and content are required.");

    let req = authed(TestRequest::post().uri("/api/admin/articles"))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_update_requires_published_status() {
    let env = setup().await;
    let app = init_app!(env);

    let req = authed(TestRequest::post().uri("/api/admin/articles"))
        .set_json(json!({ "title": "T", "genre": "G", "content": "C" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = authed(TestRequest::put().uri(&format!("/api/admin/articles/{}", id)))
        .set_json(json!({ "title": "T", "genre": "G", "content": "C" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = authed(TestRequest::put().uri("/api/admin/articles/missing"))
        .set_json(json!({ "title": "T", "genre": "G", "content": "C", "published": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_update_slug_conflict() {
    let env = setup().await;
    let app = init_app!(env);

    let mut ids = Vec::new();
    for title in ["Alpha", "Beta"] {
        let req = authed(TestRequest::post().uri("/api/admin/articles"))
            .set_json(json!({ "title": title, "genre": "G", "content": "C" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let req = authed(TestRequest::put().uri(&format!("/api/admin/articles/{}", ids[1])))
        .set_json(json!({
            "title": "Beta", "genre": "G", "content": "C", "published": false, "slug": "alpha"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
}

#[actix_rt::test]
async fn test_admin_genres_include_drafts() {
    let env = setup().await;
    let app = init_app!(env);

    for (title, genre, published) in [("A", "Rust", true), ("B", "Essays", false)] {
        let req = authed(TestRequest::post().uri("/api/admin/articles"))
            .set_json(json!({
                "title": title, "genre": genre, "content": "C", "published": published
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = authed(TestRequest::get().uri("/api/admin/genres")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["data"],
        json!([{ "genre": "Essays", "count": 1 }, { "genre": "Rust", "count": 1 }])
    );

    let req = TestRequest::get().uri("/api/genres").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([{ "genre": "Rust", "count": 1 }]));
}

// =============================================================================
// Uploads
// =============================================================================

#[actix_rt::test]
async fn test_upload_image_and_serve_it() {
    let env = setup().await;
    let app = init_app!(env);

    let png = b"\x89PNG\r\n\x1a\nfake-image-bytes";
    let (content_type, body) = multipart_body("cat photo.png", "image/png", png);
    let req = authed(TestRequest::post().uri("/api/admin/upload"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with("-cat_photo.png"), "{}", filename);
    let url = body["data"]["url"].as_str().unwrap().to_string();
    assert_eq!(url, format!("/uploads/images/{}", filename));

    let req = TestRequest::get().uri(&url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
    let served = test::read_body(resp).await;
    assert_eq!(&served[..], &png[..]);
}

#[actix_rt::test]
async fn test_upload_keeps_dots_inside_file_name() {
    let env = setup().await;
    let app = init_app!(env);

    let (content_type, body) = multipart_body("summer..final.png", "image/png", b"png-bytes");
    let req = authed(TestRequest::post().uri("/api/admin/upload"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with("-summer..final.png"), "{}", filename);

    let req = TestRequest::get()
        .uri(&format!("/uploads/images/{}", filename))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::CONTENT_DISPOSITION).is_none());
}

#[actix_rt::test]
async fn test_svg_upload_is_served_as_attachment() {
    let env = setup().await;
    let app = init_app!(env);

    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#;
    let (content_type, body) = multipart_body("logo.svg", "image/svg+xml", svg);
    let req = authed(TestRequest::post().uri("/api/admin/upload"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let url = body["data"]["url"].as_str().unwrap().to_string();

    let req = TestRequest::get().uri(&url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok()),
        Some("attachment")
    );
}

#[actix_rt::test]
async fn test_upload_rejections() {
    let env = setup().await;
    let app = init_app!(env);

    // 非图片
    let (content_type, body) = multipart_body("notes.txt", "text/plain", b"hello");
    let req = authed(TestRequest::post().uri("/api/admin/upload"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // 超过大小限制
    let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
    let (content_type, body) = multipart_body("big.png", "image/png", &big);
    let req = authed(TestRequest::post().uri("/api/admin/upload"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "File size limit exceeded.");

    // 空文件
    let (content_type, body) = multipart_body("empty.png", "image/png", b"");
    let req = authed(TestRequest::post().uri("/api/admin/upload"))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No file uploaded.");

    // 未登录
    let (content_type, body) = multipart_body("cat.png", "image/png", b"x");
    let req = TestRequest::post()
        .uri("/api/admin/upload")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_serve_upload_rejects_traversal_and_missing() {
    let env = setup().await;
    let app = init_app!(env);

    for uri in [
        "/uploads/images/missing.png",
        "/uploads/images/..%2Fadmin_api_test.db",
    ] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}
