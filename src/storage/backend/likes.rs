//! 匿名点赞
//!
//! (article_id, anonymous_id) 复合主键保证幂等：重复点赞不会增加计数。

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, ExprTrait,
    QueryFilter, TransactionTrait,
};
use tracing::{debug, info};

use super::{SeaOrmStorage, retry};
use crate::errors::{BlogError, Result};
use crate::storage::LikeOutcome;

use migration::entities::{article, article_like};

impl SeaOrmStorage {
    /// 在一个事务内登记点赞
    ///
    /// - 文章不存在：NotFound
    /// - 已点过赞：返回当前计数，`already_liked = true`
    /// - 首次点赞：插入记录并原子地 `like_count = like_count + 1`
    ///
    /// 整个事务在锁冲突（SQLite BUSY、死锁）时按 [`retry::with_retry`] 重新执行。
    pub async fn register_like(&self, article_id: &str, anonymous_id: &str) -> Result<LikeOutcome> {
        let outcome = retry::with_retry(
            &format!("register_like({})", article_id),
            self.retry_config,
            || self.register_like_once(article_id, anonymous_id),
        )
        .await
        .map_err(|e| BlogError::database_operation(format!("登记点赞失败: {}", e)))?;

        let Some(outcome) = outcome else {
            return Err(BlogError::not_found("Article not found."));
        };

        if outcome.already_liked {
            debug!("Duplicate like ignored: article={}", article_id);
        } else {
            info!(
                "Like registered: article={}, count={}",
                article_id, outcome.like_count
            );
        }
        Ok(outcome)
    }

    /// 单次事务尝试；文章不存在时返回 `Ok(None)` 并回滚
    async fn register_like_once(
        &self,
        article_id: &str,
        anonymous_id: &str,
    ) -> std::result::Result<Option<LikeOutcome>, DbErr> {
        let txn = self.db.begin().await?;

        // 首条语句就是写操作：SQLite 在此拿到写锁，并发事务在 busy_timeout 内排队，
        // 不会出现先读后写时的锁升级失败
        lock_article_row(&txn, article_id).await?;

        let Some(current) = article::Entity::find_by_id(article_id.to_string())
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let like = article_like::ActiveModel {
            article_id: Set(article_id.to_string()),
            anonymous_id: Set(anonymous_id.to_string()),
            created_at: Set(Utc::now()),
        };

        // ON CONFLICT DO NOTHING：重复点赞（包括并发的重复点赞）在这里被识别
        let inserted = match article_like::Entity::insert(like)
            .on_conflict(
                OnConflict::columns([
                    article_like::Column::ArticleId,
                    article_like::Column::AnonymousId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
        {
            Ok(rows) => rows > 0,
            Err(DbErr::RecordNotInserted) => false,
            Err(e) => return Err(e),
        };

        if !inserted {
            txn.commit().await?;
            return Ok(Some(LikeOutcome {
                article_id: article_id.to_string(),
                like_count: std::cmp::max(current.like_count, 0),
                already_liked: true,
            }));
        }

        article::Entity::update_many()
            .col_expr(
                article::Column::LikeCount,
                Expr::col(article::Column::LikeCount).add(1),
            )
            .filter(article::Column::Id.eq(article_id))
            .exec(&txn)
            .await?;

        let like_count = article::Entity::find_by_id(article_id.to_string())
            .one(&txn)
            .await?
            .map(|m| std::cmp::max(m.like_count, 0))
            .unwrap_or(current.like_count + 1);

        txn.commit().await?;

        Ok(Some(LikeOutcome {
            article_id: article_id.to_string(),
            like_count,
            already_liked: false,
        }))
    }
}

/// 对文章行做一次不改变数据的更新，以获取写锁
async fn lock_article_row(
    txn: &DatabaseTransaction,
    article_id: &str,
) -> std::result::Result<(), DbErr> {
    article::Entity::update_many()
        .col_expr(article::Column::LikeCount, Expr::col(article::Column::LikeCount))
        .filter(article::Column::Id.eq(article_id))
        .exec(txn)
        .await?;
    Ok(())
}
