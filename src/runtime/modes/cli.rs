//! CLI mode
//!
//! This module contains the CLI mode startup logic.
//! It delegates to the actual CLI implementation.

use crate::cli::Commands;
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime;

/// Run CLI mode
///
/// This function:
/// 1. Performs pre-startup processing for CLI mode
/// 2. Delegates to the actual CLI implementation
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    lifetime::startup::cli_pre_startup().await;
    crate::interfaces::cli::run_cli_command(cmd).await
}
