//! Mutation operations for SeaOrmStorage
//!
//! This module contains all article write operations.

use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;

use super::converters::article_to_active_model;
use super::{SeaOrmStorage, retry};
use crate::errors::{BlogError, Result};
use crate::storage::Article;

use migration::entities::{article, article_like};

impl SeaOrmStorage {
    pub async fn insert_article(&self, article: &Article) -> Result<()> {
        let db = &self.db;

        retry::with_retry(
            &format!("insert_article({})", article.id),
            self.retry_config,
            || async {
                article::Entity::insert(article_to_active_model(article, true))
                    .exec_without_returning(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            BlogError::database_operation(format!("创建文章 '{}' 失败: {}", article.title, e))
        })?;

        info!("Article created: {} ({})", article.id, article.title);
        Ok(())
    }

    /// 覆盖可编辑字段；created_at 与 like_count 不变
    pub async fn update_article(&self, article: &Article) -> Result<()> {
        let db = &self.db;
        let id = article.id.clone();

        let result = retry::with_retry(
            &format!("update_article({})", article.id),
            self.retry_config,
            || async {
                article::Entity::update_many()
                    .set(article_to_active_model(article, false))
                    .filter(article::Column::Id.eq(id.clone()))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| BlogError::database_operation(format!("更新文章失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(BlogError::not_found("Article not found for update."));
        }

        info!("Article updated: {}", article.id);
        Ok(())
    }

    /// 删除文章及其点赞记录（同一事务，锁冲突时整体重试）
    pub async fn delete_article(&self, id: &str) -> Result<()> {
        let deleted = retry::with_retry(
            &format!("delete_article({})", id),
            self.retry_config,
            || self.delete_article_once(id),
        )
        .await
        .map_err(|e| BlogError::database_operation(format!("删除文章失败: {}", e)))?;

        if !deleted {
            return Err(BlogError::not_found("Article not found."));
        }

        info!("Article deleted: {}", id);
        Ok(())
    }

    /// 单次事务尝试；文章不存在时回滚并返回 `false`
    async fn delete_article_once(&self, id: &str) -> std::result::Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        article_like::Entity::delete_many()
            .filter(article_like::Column::ArticleId.eq(id))
            .exec(&txn)
            .await?;

        let result = article::Entity::delete_by_id(id.to_string())
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            // txn 在 drop 时回滚
            return Ok(false);
        }

        txn.commit().await?;
        Ok(true)
    }
}
