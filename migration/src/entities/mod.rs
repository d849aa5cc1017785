pub mod article;
pub mod article_like;

pub use article::Entity as ArticleEntity;
pub use article_like::Entity as ArticleLikeEntity;
