//! Admin API 路由配置

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use crate::api::middleware::AdminAuth;

use super::article_crud::{
    create_article, delete_article, get_article, list_articles, list_genres, update_article,
};
use super::upload::upload_image;

/// 文章管理路由 `/articles`
///
/// 包含：
/// - GET /articles - 获取所有文章（含草稿）
/// - POST /articles - 创建文章
/// - GET /articles/{id} - 获取单篇文章
/// - PUT /articles/{id} - 更新文章
/// - DELETE /articles/{id} - 删除文章
pub fn articles_routes() -> actix_web::Scope {
    web::scope("/articles")
        .route("", web::get().to(list_articles))
        .route("", web::post().to(create_article))
        .route("/{id}", web::get().to(get_article))
        .route("/{id}", web::put().to(update_article))
        .route("/{id}", web::delete().to(delete_article))
}

/// Admin API 路由 `/admin`，整体经过 [`AdminAuth`]
pub fn admin_routes() -> impl HttpServiceFactory {
    web::scope("/admin")
        .wrap(AdminAuth)
        .service(articles_routes())
        .route("/genres", web::get().to(list_genres))
        .route("/upload", web::post().to(upload_image))
}
