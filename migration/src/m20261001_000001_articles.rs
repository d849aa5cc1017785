use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 articles 表
        manager
            .create_table(
                Table::create()
                    .table(Article::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Article::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Article::Title).string().not_null())
                    .col(ColumnDef::new(Article::Genre).string_len(100).not_null())
                    .col(ColumnDef::new(Article::Content).text().not_null())
                    .col(
                        ColumnDef::new(Article::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Article::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Article::Published)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Article::ThumbnailUrl).text().null())
                    .col(ColumnDef::new(Article::Slug).string().null().unique_key())
                    .col(
                        ColumnDef::new(Article::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 公开列表按 published + updated_at 过滤排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_articles_published_updated")
                    .table(Article::Table)
                    .col(Article::Published)
                    .col(Article::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_articles_genre")
                    .table(Article::Table)
                    .col(Article::Genre)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_articles_genre").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_articles_published_updated")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Article::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Article {
    #[sea_orm(iden = "articles")]
    Table,
    Id,
    Title,
    Genre,
    Content,
    CreatedAt,
    UpdatedAt,
    Published,
    ThumbnailUrl,
    Slug,
    LikeCount,
}
