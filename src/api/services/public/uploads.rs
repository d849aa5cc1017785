//! 本地上传文件访问 `/uploads/images/{filename}`

use actix_web::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{error, trace};

use crate::services::LocalStore;
use crate::services::object_store::{content_type_for, is_active_content};

pub async fn serve_upload(
    path: web::Path<String>,
    store: web::Data<Arc<LocalStore>>,
) -> impl Responder {
    let filename = path.into_inner();

    match store.read(&filename).await {
        Ok(Some(data)) => {
            trace!("Serving upload {}", filename);
            // 文件名带时间戳，内容不会变化
            let mut response = HttpResponse::Ok();
            response
                .insert_header((CONTENT_TYPE, content_type_for(&filename)))
                .insert_header((CACHE_CONTROL, "public, max-age=31536000, immutable"));
            // SVG 可以内嵌脚本，不允许在本站源下直接打开
            if is_active_content(&filename) {
                response.insert_header((CONTENT_DISPOSITION, "attachment"));
            }
            response.body(data)
        }
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => {
            error!("Failed to read upload {}: {}", filename, e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// 上传文件路由 `/uploads`
pub fn uploads_routes() -> actix_web::Scope {
    web::scope("/uploads")
        .route("/images/{filename}", web::get().to(serve_upload))
        .route("/images/{filename}", web::head().to(serve_upload))
}
