//! Migrate command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::storage::SeaOrmStorage;

/// 迁移在创建存储时已经执行，这里只报告结果
pub async fn migrate(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let count = storage
        .count()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    println!(
        "{} Database is up to date ({}, {} articles)",
        "✓".bold().green(),
        storage.get_backend_config().storage_type.blue(),
        count.to_string().green()
    );
    Ok(())
}
