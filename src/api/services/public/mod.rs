//! 公开 API：文章列表、详情、类别、点赞、翻译，以及本地上传文件访问

mod articles;
mod likes;
pub mod rate_limit;
mod translate;
mod uploads;

use actix_web::web;

pub use articles::{detail, feed, genres};
pub use likes::like;
pub use rate_limit::ClientIpKeyExtractor;
pub use translate::{MISSING_FIELDS_MESSAGE, translate};
pub use uploads::{serve_upload, uploads_routes};

use rate_limit::{like_rate_limiter, translate_rate_limiter};

/// 文章路由 `/articles`
pub fn articles_routes() -> actix_web::Scope {
    web::scope("/articles")
        .route("", web::get().to(feed))
        .route("/{id_or_slug}", web::get().to(detail))
}

/// 点赞路由 `/like`
pub fn like_routes() -> actix_web::Scope {
    web::scope("/like").route(
        "/{article_id}",
        web::post().to(like).wrap(like_rate_limiter()),
    )
}

/// 翻译路由 `/translate`
pub fn translate_routes() -> actix_web::Scope {
    web::scope("/translate").route(
        "",
        web::post().to(translate).wrap(translate_rate_limiter()),
    )
}
