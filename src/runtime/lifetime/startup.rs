use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::{SameSitePolicy, get_config};
use crate::services::{
    ArticleService, IdentityProvider, LikeService, LocalStore, ObjectStore, Translator,
    identity_from_config, object_store_from_config, translator_from_config,
};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub article_service: Arc<ArticleService>,
    pub like_service: Arc<LikeService>,
    pub translator: Arc<dyn Translator>,
    pub object_store: Arc<dyn ObjectStore>,
    pub local_store: Arc<LocalStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// 准备服务器启动的上下文
/// 包括存储、业务服务和外部集成（翻译、对象存储、OAuth）
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))?;

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let config = get_config();

    let article_service = Arc::new(ArticleService::new(storage.clone()));
    let like_service = Arc::new(LikeService::new(storage.clone()));

    let translator = translator_from_config(&config.translate);
    let object_store = object_store_from_config(&config.uploads);
    debug!("Upload backend: {}", object_store.name());

    // 本地上传目录始终挂载，切换到 Supabase 后旧图片仍可访问
    let local_store = Arc::new(LocalStore::new(
        &config.uploads.local_dir,
        &config.uploads.public_base_url,
    ));

    let identity = identity_from_config(&config.auth);

    check_component_enabled();

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        article_service,
        like_service,
        translator,
        object_store,
        local_store,
        identity,
    })
}

fn check_component_enabled() {
    let config = get_config();
    let auth = &config.auth;

    if auth.admin_enabled() {
        info!("Admin API available at: /api/admin");
    } else {
        info!("Admin API is disabled (auth.admin_email not set)");
    }

    if auth.admin_enabled()
        && (auth.google_client_id.is_empty() || auth.google_client_secret.is_empty())
    {
        warn!("OAuth client is not configured, admin login will fail until it is set");
    }

    if !auth.jwt_secret.is_empty() && auth.jwt_secret.len() < 32 {
        warn!(
            "WARNING: JWT Secret is too short ({} bytes). \
            Recommended minimum is 32 bytes for security.",
            auth.jwt_secret.len()
        );
    }

    if !auth.cookie_secure {
        warn!(
            "WARNING: Cookie Secure flag is disabled. \
            Cookies will be sent over unencrypted HTTP connections. \
            Enable cookie_secure=true for production environments."
        );
    }

    if auth.cookie_same_site == SameSitePolicy::None && !auth.cookie_secure {
        warn!("SameSite=None without Secure will be rejected by browsers");
    }

    if config.translate.api_key.is_empty() {
        info!("Translation is disabled (translate.api_key not set)");
    }
}

/// CLI 模式预处理：数据库驱动的 TLS 也需要 crypto provider
#[cfg(feature = "cli")]
pub async fn cli_pre_startup() {
    // 重复安装会返回 Err，可忽略
    let _ = rustls::crypto::ring::default_provider().install_default();
}
