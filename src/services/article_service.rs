//! Article management service
//!
//! Admin CRUD and the published-only read paths used by the public API.
//! Handlers and CLI commands both go through here so that validation,
//! slug allocation and timestamps behave the same everywhere.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::get_config;
use crate::errors::{BlogError, Result};
use crate::storage::{Article, ArticleFilter, SeaOrmStorage};
use crate::utils::slug;

use super::feed::{self, FeedPage, FeedQuery, GenreCount};

/// 创建时的必填字段提示
pub const CREATE_REQUIRED_MESSAGE: &str = "Title, genre, and content are required.";
/// 更新时的必填字段提示
pub const UPDATE_REQUIRED_MESSAGE: &str =
    "Title, genre, content, and published status are required and must be valid.";

/// slug 冲突后缀的尝试上限
const MAX_SLUG_ATTEMPTS: u32 = 1000;

// ============ Request DTOs ============

#[derive(Debug, Clone, Default)]
pub struct CreateArticleRequest {
    pub title: String,
    pub genre: String,
    pub content: String,
    /// 缺省为草稿
    pub published: Option<bool>,
    pub thumbnail_url: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateArticleRequest {
    pub title: String,
    pub genre: String,
    pub content: String,
    /// 必须显式给出
    pub published: Option<bool>,
    /// `None` = 保持，`Some(None)` = 清除，`Some(Some(url))` = 设置
    pub thumbnail_url: Option<Option<String>>,
    /// `None` = 保持；空串表示按标题重新生成
    pub slug: Option<String>,
}

/// 文章详情（含相关文章）
#[derive(Debug, Clone)]
pub struct ArticleDetail {
    pub article: Article,
    pub related: Vec<Article>,
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn normalize_thumbnail(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

// ============ ArticleService ============

pub struct ArticleService {
    storage: Arc<SeaOrmStorage>,
}

impl ArticleService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 找到一个未被占用的 slug：`base`, `base-2`, `base-3`, ...
    async fn allocate_slug(&self, base: &str, excluding_id: Option<&str>) -> Result<String> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let candidate = slug::candidate(base, attempt);
            if !self.storage.slug_exists(&candidate, excluding_id).await? {
                if attempt > 1 {
                    debug!("Slug '{}' taken, using '{}'", base, candidate);
                }
                return Ok(candidate);
            }
        }
        Err(BlogError::conflict(format!(
            "Could not allocate a unique slug for '{}'.",
            base
        )))
    }

    /// slug 基础值：显式 slug → 标题 → id 前 8 位
    fn slug_base(requested: Option<&str>, title: &str, id: &str) -> String {
        requested
            .and_then(slug::slugify)
            .or_else(|| slug::slugify(title))
            .unwrap_or_else(|| slug::fallback_from_id(id))
    }

    // ============ Admin CRUD ============

    pub async fn create_article(&self, req: CreateArticleRequest) -> Result<Article> {
        if is_blank(&req.title) || is_blank(&req.genre) || is_blank(&req.content) {
            return Err(BlogError::validation(CREATE_REQUIRED_MESSAGE));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let base = Self::slug_base(req.slug.as_deref(), &req.title, &id);
        let slug = self.allocate_slug(&base, None).await?;
        let now = Utc::now();

        let article = Article {
            id,
            title: req.title.trim().to_string(),
            genre: req.genre.trim().to_string(),
            content: req.content,
            created_at: now,
            updated_at: now,
            published: req.published.unwrap_or(false),
            thumbnail_url: normalize_thumbnail(req.thumbnail_url),
            slug: Some(slug),
            like_count: 0,
        };

        self.storage.insert_article(&article).await?;
        info!(
            "Article created: {} (slug: {:?}, published: {})",
            article.id, article.slug, article.published
        );
        Ok(article)
    }

    /// 所有文章（含草稿），updated_at 倒序
    pub async fn list_articles(&self) -> Result<Vec<Article>> {
        let mut articles = self.storage.load_articles(ArticleFilter::all()).await?;
        articles.sort_by(feed::feed_order);
        Ok(articles)
    }

    pub async fn get_article(&self, id: &str) -> Result<Article> {
        self.storage
            .get_article(id)
            .await?
            .ok_or_else(|| BlogError::not_found("Article not found."))
    }

    pub async fn update_article(&self, id: &str, req: UpdateArticleRequest) -> Result<Article> {
        let Some(published) = req.published else {
            return Err(BlogError::validation(UPDATE_REQUIRED_MESSAGE));
        };
        if is_blank(&req.title) || is_blank(&req.genre) || is_blank(&req.content) {
            return Err(BlogError::validation(UPDATE_REQUIRED_MESSAGE));
        }

        let existing = self
            .storage
            .get_article(id)
            .await?
            .ok_or_else(|| BlogError::not_found("Article not found for update."))?;

        let title = req.title.trim().to_string();

        let slug = match req.slug.as_deref().map(str::trim) {
            None => existing.slug.clone(),
            Some("") => {
                let base = Self::slug_base(None, &title, &existing.id);
                Some(self.allocate_slug(&base, Some(&existing.id)).await?)
            }
            Some(requested) => {
                let normalized = slug::slugify(requested)
                    .ok_or_else(|| BlogError::validation("Slug must contain letters or digits."))?;
                if self
                    .storage
                    .slug_exists(&normalized, Some(&existing.id))
                    .await?
                {
                    return Err(BlogError::conflict(format!(
                        "Slug '{}' is already used by another article.",
                        normalized
                    )));
                }
                Some(normalized)
            }
        };

        let thumbnail_url = match req.thumbnail_url {
            None => existing.thumbnail_url.clone(),
            Some(value) => normalize_thumbnail(value),
        };

        let updated = Article {
            title,
            genre: req.genre.trim().to_string(),
            content: req.content,
            published,
            thumbnail_url,
            slug,
            updated_at: Utc::now(),
            ..existing
        };

        self.storage.update_article(&updated).await?;
        info!("Article updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_article(&self, id: &str) -> Result<()> {
        self.storage.delete_article(id).await
    }

    /// 切换发布状态（CLI publish / unpublish）
    pub async fn set_published(&self, id: &str, published: bool) -> Result<Article> {
        let existing = self.get_article(id).await?;
        if existing.published == published {
            return Ok(existing);
        }

        let updated = Article {
            published,
            updated_at: Utc::now(),
            ..existing
        };
        self.storage.update_article(&updated).await?;
        info!("Article {} published={}", id, published);
        Ok(updated)
    }

    /// 所有类别（含草稿），用于编辑器的类别建议
    pub async fn admin_genres(&self) -> Result<Vec<GenreCount>> {
        let articles = self.storage.load_articles(ArticleFilter::all()).await?;
        Ok(feed::genre_counts(&articles))
    }

    // ============ Public reads ============

    /// 已发布文章分页列表
    pub async fn feed(&self, query: &FeedQuery) -> Result<FeedPage> {
        let articles = self
            .storage
            .load_articles(ArticleFilter::published())
            .await?;
        Ok(feed::build_page(articles, query, &get_config().feed))
    }

    /// 按 id 或 slug 查找已发布文章；草稿与不存在一样返回 404
    pub async fn published_detail(&self, id_or_slug: &str) -> Result<ArticleDetail> {
        let found = match self.storage.get_article(id_or_slug).await? {
            Some(article) => Some(article),
            None => self.storage.get_article_by_slug(id_or_slug).await?,
        };

        let article = found
            .filter(|a| a.published)
            .ok_or_else(|| BlogError::not_found("Article not found."))?;

        let candidates = self
            .storage
            .load_articles(ArticleFilter::published())
            .await?;
        let related = feed::pick_related(candidates, &article, get_config().feed.related_count);

        Ok(ArticleDetail { article, related })
    }

    /// 已发布文章的类别统计
    pub async fn published_genres(&self) -> Result<Vec<GenreCount>> {
        let articles = self
            .storage
            .load_articles(ArticleFilter::published())
            .await?;
        Ok(feed::genre_counts(&articles))
    }
}
