use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 文章（数据库中的一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub genre: String,
    /// Markdown 正文
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published: bool,
    pub thumbnail_url: Option<String>,
    pub slug: Option<String>,

    #[serde(default)]
    pub like_count: i64,
}

/// 文章查询过滤条件
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleFilter {
    /// 只返回已发布文章
    pub published_only: bool,
}

impl ArticleFilter {
    pub fn published() -> Self {
        Self {
            published_only: true,
        }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

/// 点赞结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOutcome {
    pub article_id: String,
    pub like_count: i64,
    /// 该匿名 ID 之前已经点过赞（计数未变化）
    pub already_liked: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
