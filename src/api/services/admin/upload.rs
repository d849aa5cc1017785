//! Admin API 图片上传

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use bytes::Bytes;
use chrono::Utc;
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::get_config;
use crate::errors::BlogError;
use crate::services::ObjectStore;
use crate::utils::upload_filename;

use super::error_code::ErrorCode;
use super::helpers::{error_from_blog, error_response, success_response};
use super::types::UploadResponse;

/// 读取到的文件字段
struct UploadedFile {
    original_name: Option<String>,
    content_type: String,
    data: Vec<u8>,
}

fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

/// 上传图片（multipart，字段名 `file`）
pub async fn upload_image(
    _req: HttpRequest,
    mut payload: Multipart,
    store: web::Data<Arc<dyn ObjectStore>>,
) -> ActixResult<impl Responder> {
    let config = get_config();
    let max_size = config.uploads.max_file_size;
    let images_only = config.uploads.images_only;

    let mut upload: Option<UploadedFile> = None;

    // 解析 multipart form data
    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Ok(error_from_blog(&BlogError::invalid_multipart_data(
                    format!("Invalid multipart data: {}", e),
                )));
            }
        };

        if field.name() != Some("file") || upload.is_some() {
            // 其他字段丢弃
            while let Some(chunk) = field.next().await {
                if chunk.is_err() {
                    break;
                }
            }
            continue;
        }

        let content_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if images_only && !is_image(&content_type) {
            warn!("Admin API: rejected upload with content type {}", content_type);
            return Ok(error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorCode::UnsupportedMediaType,
                "Only image uploads are allowed.",
            ));
        }

        let original_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        // 读取文件内容（带大小限制）
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => {
                    if data.len() + bytes.len() > max_size {
                        warn!("Admin API: upload exceeds {} bytes", max_size);
                        return Ok(error_response(
                            StatusCode::PAYLOAD_TOO_LARGE,
                            ErrorCode::FileTooLarge,
                            "File size limit exceeded.",
                        ));
                    }
                    data.extend_from_slice(&bytes);
                }
                Err(e) => {
                    error!("Failed to read file chunk: {}", e);
                    return Ok(error_from_blog(&BlogError::invalid_multipart_data(
                        format!("Failed to read file: {}", e),
                    )));
                }
            }
        }

        upload = Some(UploadedFile {
            original_name,
            content_type,
            data,
        });
    }

    let Some(file) = upload.filter(|f| !f.data.is_empty()) else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::NoFileUploaded,
            "No file uploaded.",
        ));
    };

    let filename = upload_filename(file.original_name.as_deref(), Utc::now().timestamp_millis());
    let size = file.data.len();

    match store
        .put(&filename, &file.content_type, Bytes::from(file.data))
        .await
    {
        Ok(url) => {
            info!(
                "Admin API: uploaded {} ({} bytes) via {}",
                filename,
                size,
                store.name()
            );
            Ok(success_response(UploadResponse { url, filename }))
        }
        Err(e) => {
            error!("Admin API: upload failed - {}", e);
            Ok(error_from_blog(&e))
        }
    }
}
