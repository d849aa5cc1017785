use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{trace, warn};

use crate::api::services::admin::{
    ErrorCode, TranslateRequest, TranslateResponse, error_response, success_response,
};
use crate::errors::BlogError;
use crate::services::Translator;

pub const MISSING_FIELDS_MESSAGE: &str =
    r#"Missing "text" or "targetLanguage" in request body."#;

/// 翻译代理：字符串进字符串出，数组进数组出
pub async fn translate(
    body: Option<web::Json<TranslateRequest>>,
    translator: web::Data<Arc<dyn Translator>>,
) -> ActixResult<impl Responder> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();

    let target = request
        .target_language
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let (Some(text), Some(target)) = (request.text.filter(|t| !t.is_blank()), target) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::TranslateInvalidRequest,
            MISSING_FIELDS_MESSAGE,
        ));
    };

    let texts = text.clone().into_vec();
    trace!(
        "Translate {} text(s) to {} via {}",
        texts.len(),
        target,
        translator.name()
    );

    match translator.translate(&texts, &target).await {
        Ok(translated) => Ok(success_response(TranslateResponse {
            translated_text: text.reshape(translated),
        })),
        Err(BlogError::ServiceUnavailable(msg)) => Ok(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::TranslateUnavailable,
            &msg,
        )),
        Err(e) => {
            warn!("Translation failed: {}", e.message());
            Ok(error_response(
                StatusCode::BAD_GATEWAY,
                ErrorCode::TranslateFailed,
                &format!("Translation failed: {}", e.message()),
            ))
        }
    }
}
