//! CLI interface module
//!
//! This module provides command-line interface functionality for inkpost.

pub mod commands;

use crate::cli::{Commands, ConfigCommands};
use crate::storage::StorageFactory;
use commands::{config_management, delete_article, list_articles, migrate, set_published};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::BlogError> for CliError {
    fn from(err: crate::errors::BlogError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // config generate 不需要数据库连接
    if let Commands::Config { action } = cmd {
        let ConfigCommands::Generate { output_path, force } = action;
        return config_management::config_generate(output_path, force).await;
    }

    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    match cmd {
        Commands::List { drafts } => list_articles(storage, drafts).await,

        Commands::Publish { id } => set_published(storage, id, true).await,

        Commands::Unpublish { id } => set_published(storage, id, false).await,

        Commands::Delete { id } => delete_article(storage, id).await,

        Commands::Migrate => migrate(storage).await,

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server mode".to_string(),
        )),

        Commands::Config { .. } => unreachable!("handled above"),
    }
}
