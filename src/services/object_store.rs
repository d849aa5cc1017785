//! 图片存储后端
//!
//! - `local`: 写入本地目录，由 `/uploads/images/{filename}` 提供访问
//! - `supabase`: Supabase Storage REST API

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};
use ureq::Agent;

use crate::config::{UploadBackend, UploadsConfig};
use crate::errors::{BlogError, Result};

/// 对象存储上传超时
const UPLOAD_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 保存对象，返回公开访问 URL
    async fn put(&self, filename: &str, content_type: &str, data: Bytes) -> Result<String>;

    fn name(&self) -> &'static str;
}

pub fn object_store_from_config(config: &UploadsConfig) -> Arc<dyn ObjectStore> {
    match config.backend {
        UploadBackend::Local => Arc::new(LocalStore::new(&config.local_dir, &config.public_base_url)),
        UploadBackend::Supabase => Arc::new(SupabaseStore::new(
            &config.supabase_url,
            &config.supabase_service_key,
            &config.supabase_bucket,
        )),
    }
}

/// 文件名只允许单层名字，拒绝路径分隔符和隐藏文件（包括 `.` 与 `..`）
///
/// 名字中间的 `..`（如 `summer..final.png`）仍是同一层，允许。
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\', '\0'])
}

/// 可能携带脚本的图片类型，访问时强制下载
pub fn is_active_content(filename: &str) -> bool {
    content_type_for(filename) == "image/svg+xml"
}

/// 由扩展名推断 Content-Type
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

// ============ LocalStore ============

pub struct LocalStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 读取已上传的文件；不存在或文件名不安全时返回 `None`
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>> {
        if !is_safe_filename(filename) {
            return Ok(None);
        }
        match tokio::fs::read(self.dir.join(filename)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, filename: &str, _content_type: &str, data: Bytes) -> Result<String> {
        if !is_safe_filename(filename) {
            return Err(BlogError::validation(format!(
                "Invalid file name: {}",
                filename
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            BlogError::file_operation(format!(
                "Could not create upload directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            BlogError::file_operation(format!("Could not write {}: {}", path.display(), e))
        })?;

        info!("Stored upload {} ({} bytes)", path.display(), data.len());
        Ok(format!("{}/{}", self.public_base_url, filename))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

// ============ SupabaseStore ============

pub struct SupabaseStore {
    agent: Agent,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(UPLOAD_TIMEOUT_SECS)))
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_path(&self, filename: &str) -> String {
        format!("{}/{}", self.bucket, urlencoding::encode(filename))
    }

    pub fn upload_url(&self, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/{}",
            self.base_url,
            self.object_path(filename)
        )
    }

    pub fn public_url(&self, filename: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}",
            self.base_url,
            self.object_path(filename)
        )
    }
}

#[async_trait]
impl ObjectStore for SupabaseStore {
    async fn put(&self, filename: &str, content_type: &str, data: Bytes) -> Result<String> {
        if self.base_url.is_empty() || self.service_key.is_empty() {
            return Err(BlogError::service_unavailable(
                "Supabase storage is not configured.",
            ));
        }

        let agent = self.agent.clone();
        let url = self.upload_url(filename);
        let key = self.service_key.clone();
        let content_type = content_type.to_string();

        tokio::task::spawn_blocking(move || {
            agent
                .post(&url)
                .header("Authorization", &format!("Bearer {}", key))
                .header("apikey", &key)
                .header("Content-Type", &content_type)
                .header("x-upsert", "false")
                .send(&data[..])
                .map(|_| ())
                .map_err(|e| BlogError::external_service(format!("Upload failed: {}", e)))
        })
        .await
        .map_err(|e| BlogError::external_service(format!("Upload task failed: {}", e)))??;

        debug!("Uploaded {} to bucket {}", filename, self.bucket);
        Ok(self.public_url(filename))
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
