use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumMessage};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Cookie SameSite 策略
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    EnumIter,
    AsRefStr,
    EnumMessage,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum SameSitePolicy {
    #[strum(message = "Most secure, only same-site requests carry cookies")]
    Strict,
    #[default]
    #[strum(message = "Default, allows the OAuth redirect back to carry cookies")]
    Lax,
    #[strum(message = "No restrictions, requires Secure attribute")]
    None,
}

impl std::fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Invalid SameSite policy: '{}'. Valid: Strict, Lax, None",
                s
            )),
        }
    }
}

/// 图片上传存储后端
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UploadBackend {
    /// 写入本地目录，由 /uploads/images 路由提供访问
    #[default]
    Local,
    /// Supabase Storage（对象存储）
    Supabase,
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量、可信代理
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - auth: 管理员邮箱、OAuth 客户端、会话 Cookie
/// - uploads: 图片上传
/// - translate: 翻译 API
/// - cors: 跨域
/// - feed: 公开文章列表
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：INK，分隔符：__
    /// 示例：INK__AUTH__ADMIN_EMAIL=me@example.com
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// 从指定路径加载（`None` 时使用 config.toml）
    pub fn load_from(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 INK，分隔符 __
            .add_source(
                Environment::with_prefix("INK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("server.trusted_proxies")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 可信反向代理（IP 或 CIDR），来自它们的请求使用 X-Forwarded-For 作为客户端 IP
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 管理员认证配置
///
/// `admin_email` 为空时 Admin API 整体关闭（返回 404）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub admin_email: String,
    #[serde(default)]
    pub google_client_id: String,
    #[serde(default)]
    pub google_client_secret: String,
    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
    /// 为空时启动时生成随机密钥（重启后会话失效）
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_session_hours")]
    pub session_hours: u64,
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
    #[serde(default)]
    pub cookie_same_site: SameSitePolicy,
    #[serde(default)]
    pub cookie_domain: Option<String>,
    #[serde(default = "default_post_login_redirect")]
    pub post_login_redirect: String,
}

impl AuthConfig {
    pub fn admin_enabled(&self) -> bool {
        !self.admin_email.trim().is_empty()
    }

    /// 邮箱比较（忽略大小写与首尾空白）
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_enabled() && self.admin_email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// 图片上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    #[serde(default)]
    pub backend: UploadBackend,
    #[serde(default = "default_upload_dir")]
    pub local_dir: String,
    #[serde(default = "default_upload_public_base")]
    pub public_base_url: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
    #[serde(default = "default_images_only")]
    pub images_only: bool,
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub supabase_service_key: String,
    #[serde(default = "default_supabase_bucket")]
    pub supabase_bucket: String,
}

/// 翻译 API 配置（Google Cloud Translation v2）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_translate_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_translate_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_translate_cache_ttl")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_translate_cache_capacity")]
    pub cache_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

/// 公开文章列表配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
    #[serde(default = "default_related_count")]
    pub related_count: usize,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://inkpost.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_redirect_url() -> String {
    "http://localhost:8080/api/auth/callback".to_string()
}

fn default_authorize_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://openidconnect.googleapis.com/v1/userinfo".to_string()
}

fn default_session_hours() -> u64 {
    24
}

fn default_cookie_secure() -> bool {
    true
}

fn default_post_login_redirect() -> String {
    "/admin".to_string()
}

fn default_upload_dir() -> String {
    "public/uploads/images".to_string()
}

fn default_upload_public_base() -> String {
    "/uploads/images".to_string()
}

fn default_max_file_size() -> usize {
    10 * 1024 * 1024
}

fn default_images_only() -> bool {
    true
}

fn default_supabase_bucket() -> String {
    "images".to_string()
}

fn default_translate_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_translate_timeout() -> u64 {
    10
}

fn default_translate_cache_ttl() -> u64 {
    3600
}

fn default_translate_cache_capacity() -> u64 {
    5000
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    50
}

fn default_excerpt_length() -> usize {
    160
}

fn default_related_count() -> usize {
    3
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: String::new(),
            google_client_id: String::new(),
            google_client_secret: String::new(),
            redirect_url: default_redirect_url(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            userinfo_url: default_userinfo_url(),
            jwt_secret: String::new(),
            session_hours: default_session_hours(),
            cookie_secure: default_cookie_secure(),
            cookie_same_site: SameSitePolicy::default(),
            cookie_domain: None,
            post_login_redirect: default_post_login_redirect(),
        }
    }
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            backend: UploadBackend::default(),
            local_dir: default_upload_dir(),
            public_base_url: default_upload_public_base(),
            max_file_size: default_max_file_size(),
            images_only: default_images_only(),
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            supabase_bucket: default_supabase_bucket(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_translate_endpoint(),
            timeout_secs: default_translate_timeout(),
            cache_ttl_secs: default_translate_cache_ttl(),
            cache_capacity: default_translate_cache_capacity(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: Vec::new(),
            allow_credentials: false,
            max_age: default_cors_max_age(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            excerpt_length: default_excerpt_length(),
            related_count: default_related_count(),
        }
    }
}
