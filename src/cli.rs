//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for inkpost using clap's derive macros.

use clap::{Parser, Subcommand};

/// inkpost - A personal blog backend
#[derive(Parser)]
#[command(name = "inkpost")]
#[command(version)]
#[command(about = "A personal blog backend with an OAuth-gated admin API", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default when no command is given)
    Serve,

    /// List articles
    List {
        /// Only show unpublished drafts
        #[arg(long)]
        drafts: bool,
    },

    /// Publish an article
    Publish {
        /// Article id
        id: String,
    },

    /// Move an article back to drafts
    Unpublish {
        /// Article id
        id: String,
    },

    /// Delete an article and its likes
    Delete {
        /// Article id
        id: String,
    },

    /// Apply pending database migrations
    Migrate,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
