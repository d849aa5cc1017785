//! Delete article command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::storage::SeaOrmStorage;

pub async fn delete_article(storage: Arc<SeaOrmStorage>, id: String) -> Result<(), CliError> {
    // 先确认文章存在，给出更明确的提示
    let exists = storage
        .get_article(&id)
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to check article: {}", e)))?;

    if exists.is_none() {
        return Err(CliError::CommandError(format!(
            "Article does not exist: {}",
            id
        )));
    }

    storage
        .delete_article(&id)
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to delete: {}", e)))?;

    println!("{} Deleted article: {}", "✓".bold().green(), id.cyan());

    Ok(())
}
