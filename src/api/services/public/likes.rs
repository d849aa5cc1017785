use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::debug;

use crate::api::services::admin::{
    ErrorCode, LikeRequest, LikeResponse, error_from_blog, error_response, success_with_message,
};
use crate::errors::BlogError;
use crate::services::{ANONYMOUS_ID_REQUIRED, LikeService};

/// 匿名点赞；同一 ID 重复点赞返回 200 和当前计数
pub async fn like(
    path: web::Path<String>,
    body: Option<web::Json<LikeRequest>>,
    service: web::Data<Arc<LikeService>>,
) -> ActixResult<impl Responder> {
    let article_id = path.into_inner();
    let anonymous_id = body.and_then(|b| b.into_inner().anonymous_user_id);

    match service.like(&article_id, anonymous_id.as_deref()).await {
        Ok(outcome) => {
            let message = if outcome.already_liked {
                "Already liked."
            } else {
                "Like registered successfully!"
            };
            debug!(
                "Like on {}: count={} already_liked={}",
                outcome.article_id, outcome.like_count, outcome.already_liked
            );
            Ok(success_with_message(
                StatusCode::OK,
                message,
                LikeResponse {
                    article_id: outcome.article_id,
                    like_count: outcome.like_count,
                    already_liked: outcome.already_liked,
                },
            ))
        }
        Err(BlogError::Validation(msg)) => {
            let code = if msg == ANONYMOUS_ID_REQUIRED {
                ErrorCode::AnonymousIdMissing
            } else {
                ErrorCode::AnonymousIdInvalid
            };
            Ok(error_response(StatusCode::BAD_REQUEST, code, &msg))
        }
        Err(BlogError::NotFound(msg)) => Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::ArticleNotFound,
            &msg,
        )),
        Err(e) => Ok(error_from_blog(&e)),
    }
}
