//! Publish / unpublish command

use colored::Colorize;
use std::sync::Arc;

use crate::errors::BlogError;
use crate::interfaces::cli::CliError;
use crate::services::ArticleService;
use crate::storage::SeaOrmStorage;

pub async fn set_published(
    storage: Arc<SeaOrmStorage>,
    id: String,
    published: bool,
) -> Result<(), CliError> {
    let service = ArticleService::new(storage);

    let article = service
        .set_published(&id, published)
        .await
        .map_err(|e| match e {
            BlogError::NotFound(_) => {
                CliError::CommandError(format!("Article does not exist: {}", id))
            }
            other => CliError::CommandError(format!("Failed to update article: {}", other)),
        })?;

    let state = if published { "Published" } else { "Unpublished" };
    println!(
        "{} {}: {} {}",
        "✓".bold().green(),
        state,
        article.id.cyan(),
        article.title.bold()
    );

    Ok(())
}
