use sea_orm_migration::prelude::*;

use crate::m20261001_000001_articles::Article;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 复合主键 (article_id, anonymous_id) 保证同一匿名用户只能点赞一次
        manager
            .create_table(
                Table::create()
                    .table(ArticleLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArticleLike::ArticleId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArticleLike::AnonymousId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ArticleLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ArticleLike::ArticleId)
                            .col(ArticleLike::AnonymousId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_likes_article")
                            .from(ArticleLike::Table, ArticleLike::ArticleId)
                            .to(Article::Table, Article::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArticleLike::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ArticleLike {
    #[sea_orm(iden = "article_likes")]
    Table,
    ArticleId,
    AnonymousId,
    CreatedAt,
}
