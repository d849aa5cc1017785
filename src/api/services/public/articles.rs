//! 公开文章端点（只返回已发布文章）

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::trace;

use crate::api::services::admin::{
    ArticleDetailResponse, ArticleSummaryResponse, ErrorCode, FeedQueryParams,
    GenreCountResponse, PaginatedResponse, PaginationInfo, api_result, error_from_blog,
};
use crate::config::get_config;
use crate::services::{ArticleService, FeedQuery};

/// 文章列表：类别过滤、搜索、分页
pub async fn feed(
    query: web::Query<FeedQueryParams>,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    let params = query.into_inner();
    trace!("Public API: feed request {:?}", params);

    let feed_query = FeedQuery {
        genre: params.genre,
        search: params.q,
        page: params.page,
        page_size: params.page_size,
    };

    let page = match service.feed(&feed_query).await {
        Ok(page) => page,
        Err(e) => return Ok(error_from_blog(&e)),
    };

    let excerpt_length = get_config().feed.excerpt_length;
    let items: Vec<ArticleSummaryResponse> = page
        .items
        .into_iter()
        .map(|a| ArticleSummaryResponse::from_article(a, excerpt_length))
        .collect();

    Ok(HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(PaginatedResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            data: items,
            pagination: PaginationInfo {
                page: page.page,
                page_size: page.page_size,
                total: page.total,
                total_pages: page.total_pages,
            },
        }))
}

/// 文章详情（id 或 slug）
pub async fn detail(
    path: web::Path<String>,
    service: web::Data<Arc<ArticleService>>,
) -> ActixResult<impl Responder> {
    let id_or_slug = path.into_inner();
    let excerpt_length = get_config().feed.excerpt_length;

    Ok(api_result(
        service
            .published_detail(&id_or_slug)
            .await
            .map(|d| ArticleDetailResponse::from_detail(d, excerpt_length)),
    ))
}

/// 已发布文章的类别统计
pub async fn genres(service: web::Data<Arc<ArticleService>>) -> ActixResult<impl Responder> {
    Ok(api_result(service.published_genres().await.map(|genres| {
        genres
            .into_iter()
            .map(GenreCountResponse::from)
            .collect::<Vec<_>>()
    })))
}
