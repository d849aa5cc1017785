//! Anonymous likes

use std::sync::Arc;

use tracing::debug;

use crate::errors::{BlogError, Result};
use crate::storage::{LikeOutcome, SeaOrmStorage};

/// 匿名 ID 最大长度（字符）
pub const MAX_ANONYMOUS_ID_CHARS: usize = 128;

pub const ANONYMOUS_ID_REQUIRED: &str = "Anonymous user ID is required.";

pub struct LikeService {
    storage: Arc<SeaOrmStorage>,
}

impl LikeService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 校验匿名 ID，返回去掉首尾空白后的值
    pub fn validate_anonymous_id(anonymous_id: Option<&str>) -> Result<&str> {
        let id = anonymous_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BlogError::validation(ANONYMOUS_ID_REQUIRED))?;

        if id.chars().count() > MAX_ANONYMOUS_ID_CHARS {
            return Err(BlogError::validation(format!(
                "Anonymous user ID must be at most {} characters.",
                MAX_ANONYMOUS_ID_CHARS
            )));
        }
        Ok(id)
    }

    /// 对已发布文章点赞；同一匿名 ID 重复点赞不计数
    pub async fn like(&self, article_id: &str, anonymous_id: Option<&str>) -> Result<LikeOutcome> {
        let anonymous_id = Self::validate_anonymous_id(anonymous_id)?;

        let published = self
            .storage
            .get_article(article_id)
            .await?
            .is_some_and(|a| a.published);
        if !published {
            debug!("Like rejected, article {} missing or draft", article_id);
            return Err(BlogError::not_found("Article not found."));
        }

        self.storage.register_like(article_id, anonymous_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_anonymous_id() {
        assert!(matches!(
            LikeService::validate_anonymous_id(None),
            Err(BlogError::Validation(_))
        ));
        assert!(matches!(
            LikeService::validate_anonymous_id(Some("   ")),
            Err(BlogError::Validation(_))
        ));
        assert_eq!(
            LikeService::validate_anonymous_id(Some("  anon-123 ")).unwrap(),
            "anon-123"
        );

        let max = "x".repeat(MAX_ANONYMOUS_ID_CHARS);
        assert!(LikeService::validate_anonymous_id(Some(&max)).is_ok());
        let too_long = "x".repeat(MAX_ANONYMOUS_ID_CHARS + 1);
        assert!(LikeService::validate_anonymous_id(Some(&too_long)).is_err());
    }
}
