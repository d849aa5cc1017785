//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::debug;

use super::converters::model_to_article;
use super::{SeaOrmStorage, retry};
use crate::errors::{BlogError, Result};
use crate::storage::{Article, ArticleFilter};

use migration::entities::article;

impl SeaOrmStorage {
    pub async fn get_article(&self, id: &str) -> Result<Option<Article>> {
        let db = &self.db;
        let id_owned = id.to_string();

        let model = retry::with_retry(&format!("get_article({})", id), self.retry_config, || async {
            article::Entity::find_by_id(id_owned.clone()).one(db).await
        })
        .await
        .map_err(|e| BlogError::database_operation(format!("查询文章失败: {}", e)))?;

        Ok(model.map(model_to_article))
    }

    pub async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let db = &self.db;
        let slug_owned = slug.to_string();

        let model = retry::with_retry(
            &format!("get_article_by_slug({})", slug),
            self.retry_config,
            || async {
                article::Entity::find()
                    .filter(article::Column::Slug.eq(slug_owned.clone()))
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| BlogError::database_operation(format!("按 slug 查询文章失败: {}", e)))?;

        Ok(model.map(model_to_article))
    }

    /// 加载文章列表，按 updated_at 倒序
    pub async fn load_articles(&self, filter: ArticleFilter) -> Result<Vec<Article>> {
        let mut condition = Condition::all();
        if filter.published_only {
            condition = condition.add(article::Column::Published.eq(true));
        }

        let db = &self.db;
        let models = retry::with_retry("load_articles", self.retry_config, || async {
            article::Entity::find()
                .filter(condition.clone())
                .order_by_desc(article::Column::UpdatedAt)
                .order_by_desc(article::Column::CreatedAt)
                .all(db)
                .await
        })
        .await
        .map_err(|e| BlogError::database_operation(format!("加载文章列表失败: {}", e)))?;

        debug!(
            "Loaded {} articles (published_only={})",
            models.len(),
            filter.published_only
        );
        Ok(models.into_iter().map(model_to_article).collect())
    }

    /// slug 是否已被其他文章占用
    pub async fn slug_exists(&self, slug: &str, excluding_id: Option<&str>) -> Result<bool> {
        let mut condition = Condition::all().add(article::Column::Slug.eq(slug));
        if let Some(id) = excluding_id {
            condition = condition.add(article::Column::Id.ne(id));
        }

        let db = &self.db;
        let count = retry::with_retry("slug_exists", self.retry_config, || async {
            article::Entity::find()
                .filter(condition.clone())
                .count(db)
                .await
        })
        .await
        .map_err(|e| BlogError::database_operation(format!("检查 slug 失败: {}", e)))?;

        Ok(count > 0)
    }

    /// 文章总数（健康检查使用）
    pub async fn count(&self) -> Result<u64> {
        article::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| BlogError::database_operation(format!("统计文章数量失败: {}", e)))
    }
}
