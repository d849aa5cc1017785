//! API 类型定义
//!
//! 公开 API 与 Admin API 共用。文章相关载荷使用 camelCase 字段名。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::services::{ArticleDetail, GenreCount};
use crate::storage::Article;
use crate::utils::markdown::excerpt;

use super::helpers::{bool_or_none, double_option};

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../web/src/types.generated.ts";

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginatedResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
    pub pagination: PaginationInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

// ============ 文章 ============

/// 完整文章
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: String,
    pub title: String,
    pub genre: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub published: bool,
    pub thumbnail_url: Option<String>,
    pub slug: Option<String>,
    pub like_count: i64,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            title: article.title,
            genre: article.genre,
            content: article.content,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
            published: article.published,
            thumbnail_url: article.thumbnail_url,
            slug: article.slug,
            like_count: article.like_count,
        }
    }
}

/// 列表项：正文替换为纯文本摘要
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummaryResponse {
    pub id: String,
    pub title: String,
    pub genre: String,
    pub excerpt: String,
    pub thumbnail_url: Option<String>,
    pub slug: Option<String>,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl ArticleSummaryResponse {
    pub fn from_article(article: Article, excerpt_length: usize) -> Self {
        Self {
            excerpt: excerpt(&article.content, excerpt_length),
            id: article.id,
            title: article.title,
            genre: article.genre,
            thumbnail_url: article.thumbnail_url,
            slug: article.slug,
            like_count: article.like_count,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
        }
    }
}

/// 文章详情 + 相关文章
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct ArticleDetailResponse {
    #[serde(flatten)]
    pub article: ArticleResponse,
    pub related: Vec<ArticleSummaryResponse>,
}

impl ArticleDetailResponse {
    pub fn from_detail(detail: ArticleDetail, excerpt_length: usize) -> Self {
        Self {
            article: detail.article.into(),
            related: detail
                .related
                .into_iter()
                .map(|a| ArticleSummaryResponse::from_article(a, excerpt_length))
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct GenreCountResponse {
    pub genre: String,
    pub count: usize,
}

impl From<GenreCount> for GenreCountResponse {
    fn from(g: GenreCount) -> Self {
        Self {
            genre: g.genre,
            count: g.count,
        }
    }
}

/// 公开列表查询参数
#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct FeedQueryParams {
    pub genre: Option<String>,
    pub q: Option<String>,
    pub page: Option<usize>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "bool_or_none")]
    pub published: Option<bool>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// 非布尔值按缺失处理
    #[serde(default, deserialize_with = "bool_or_none")]
    pub published: Option<bool>,
    /// 缺失 = 保持，`null` = 清除
    #[serde(default, deserialize_with = "double_option")]
    #[ts(optional)]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(default)]
    pub slug: Option<String>,
}

// ============ 点赞 / 翻译 ============

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[serde(default)]
    pub anonymous_user_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub article_id: String,
    pub like_count: i64,
    pub already_liked: bool,
}

/// 单条或多条文本；响应保持与请求相同的形状
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Many(Vec<String>),
}

impl TextInput {
    pub fn is_blank(&self) -> bool {
        match self {
            TextInput::Single(s) => s.trim().is_empty(),
            TextInput::Many(items) => items.is_empty(),
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            TextInput::Single(s) => vec![s],
            TextInput::Many(items) => items,
        }
    }

    /// 按请求形状包装翻译结果
    pub fn reshape(&self, mut translated: Vec<String>) -> TextInput {
        match self {
            TextInput::Single(_) => TextInput::Single(translated.pop().unwrap_or_default()),
            TextInput::Many(_) => TextInput::Many(translated),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<TextInput>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: TextInput,
}

// ============ 上传 / 会话 ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct SessionResponse {
    pub email: String,
    pub name: Option<String>,
    pub expires_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct MessageResponse {
    pub message: String,
}

// ============ 健康检查相关类型 ============

/// 存储后端信息
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct HealthStorageBackend {
    pub storage_type: String,
}

/// 存储健康检查状态
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct HealthStorageCheck {
    pub status: String,
    pub articles_count: Option<u64>,
    pub backend: HealthStorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 健康检查项容器
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
}

/// 健康检查响应
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(
    export,
    export_to = TS_EXPORT_PATH
)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}
