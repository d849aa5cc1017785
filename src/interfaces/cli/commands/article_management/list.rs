//! List articles command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::storage::{Article, ArticleFilter, SeaOrmStorage};

pub async fn list_articles(storage: Arc<SeaOrmStorage>, drafts_only: bool) -> Result<(), CliError> {
    let articles: Vec<Article> = storage
        .load_articles(ArticleFilter::all())
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load articles: {}", e)))?
        .into_iter()
        .filter(|a| !drafts_only || !a.published)
        .collect();

    if articles.is_empty() {
        println!("{} No articles found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Article list:".bold().green());
    println!();
    for article in &articles {
        let mut info_parts = vec![format!(
            "{} {} {}",
            article.id.cyan(),
            article.title.bold(),
            format!("[{}]", article.genre).dimmed()
        )];

        if !article.published {
            info_parts.push("(draft)".yellow().to_string());
        }

        if let Some(slug) = &article.slug {
            info_parts.push(format!("/{}", slug).blue().to_string());
        }

        if article.like_count > 0 {
            info_parts.push(
                format!("(likes: {})", article.like_count)
                    .dimmed()
                    .cyan()
                    .to_string(),
            );
        }

        info_parts.push(
            article
                .created_at
                .format("%Y-%m-%d")
                .to_string()
                .dimmed()
                .to_string(),
        );

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} articles",
        "ℹ".bold().blue(),
        articles.len().to_string().green()
    );
    Ok(())
}
