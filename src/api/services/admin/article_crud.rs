//! Admin API 文章 CRUD 操作

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{ArticleService, CreateArticleRequest, UpdateArticleRequest};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_blog, json_response, success_with_message};
use super::types::{
    ArticleResponse, CreateArticleBody, GenreCountResponse, MessageResponse, UpdateArticleBody,
};

/// 获取所有文章（含草稿）
pub async fn list_articles(
    _req: HttpRequest,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    trace!("Admin API: request to list all articles");

    let result = service.list_articles().await.map(|articles| {
        articles
            .into_iter()
            .map(ArticleResponse::from)
            .collect::<Vec<_>>()
    });

    if let Ok(ref articles) = result {
        info!("Admin API: returning {} articles", articles.len());
    }
    Ok(api_result(result))
}

/// 创建文章
pub async fn create_article(
    _req: HttpRequest,
    body: web::Json<CreateArticleBody>,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    let request = CreateArticleRequest {
        title: body.title.unwrap_or_default(),
        genre: body.genre.unwrap_or_default(),
        content: body.content.unwrap_or_default(),
        published: body.published,
        thumbnail_url: body.thumbnail_url,
        slug: body.slug,
    };

    match service.create_article(request).await {
        Ok(article) => Ok(success_with_message(
            StatusCode::CREATED,
            "Article created successfully.",
            ArticleResponse::from(article),
        )),
        Err(e) => Ok(error_from_blog(&e)),
    }
}

/// 获取单篇文章
pub async fn get_article(
    _req: HttpRequest,
    path: web::Path<String>,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    trace!("Admin API: get article {}", id);
    Ok(api_result(
        service.get_article(&id).await.map(ArticleResponse::from),
    ))
}

/// 更新文章
pub async fn update_article(
    _req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateArticleBody>,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let body = body.into_inner();
    let request = UpdateArticleRequest {
        title: body.title.unwrap_or_default(),
        genre: body.genre.unwrap_or_default(),
        content: body.content.unwrap_or_default(),
        published: body.published,
        thumbnail_url: body.thumbnail_url,
        slug: body.slug,
    };

    match service.update_article(&id, request).await {
        Ok(article) => Ok(success_with_message(
            StatusCode::OK,
            "Article updated successfully.",
            ArticleResponse::from(article),
        )),
        Err(e) => Ok(error_from_blog(&e)),
    }
}

/// 删除文章
pub async fn delete_article(
    _req: HttpRequest,
    path: web::Path<String>,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();

    match service.delete_article(&id).await {
        Ok(()) => {
            info!("Admin API: article deleted - {}", id);
            let message = "Article deleted successfully.";
            Ok(json_response(
                StatusCode::OK,
                ErrorCode::Success,
                message,
                Some(MessageResponse {
                    message: message.to_string(),
                }),
            ))
        }
        Err(e) => Ok(error_from_blog(&e)),
    }
}

/// 所有类别（含草稿），供编辑器提示
pub async fn list_genres(
    _req: HttpRequest,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    Ok(api_result(service.admin_genres().await.map(|genres| {
        genres
            .into_iter()
            .map(GenreCountResponse::from)
            .collect::<Vec<_>>()
    })))
}
