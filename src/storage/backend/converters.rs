use crate::storage::Article;
use migration::entities::article;

/// 将 Sea-ORM Model 转换为 Article
pub fn model_to_article(model: article::Model) -> Article {
    Article {
        id: model.id,
        title: model.title,
        genre: model.genre,
        content: model.content,
        created_at: model.created_at,
        updated_at: model.updated_at,
        published: model.published,
        thumbnail_url: model.thumbnail_url,
        slug: model.slug,
        like_count: model.like_count.max(0),
    }
}

/// 将 Article 转换为 ActiveModel
///
/// 更新时 `created_at` 与 `like_count` 保持 NotSet：
/// 创建时间不可变，点赞数只由点赞事务修改。
pub fn article_to_active_model(article: &Article, is_new: bool) -> article::ActiveModel {
    use sea_orm::ActiveValue::*;

    article::ActiveModel {
        id: Set(article.id.clone()),
        title: Set(article.title.clone()),
        genre: Set(article.genre.clone()),
        content: Set(article.content.clone()),
        created_at: if is_new {
            Set(article.created_at)
        } else {
            NotSet
        },
        updated_at: Set(article.updated_at),
        published: Set(article.published),
        thumbnail_url: Set(article.thumbnail_url.clone()),
        slug: Set(article.slug.clone()),
        like_count: if is_new {
            Set(article.like_count)
        } else {
            NotSet
        },
    }
}
