//! Mode routing
//!
//! This module provides unified entry points for the execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (article maintenance from the terminal)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

/// Detect which mode to run from the parsed subcommand
///
/// # Mode Detection Logic
/// 1. No subcommand or `serve` -> Server mode
/// 2. Any other subcommand and CLI feature is enabled -> CLI mode
/// 3. Otherwise -> Unknown
pub fn detect_mode(command: Option<&crate::cli::Commands>) -> Mode {
    #[cfg(feature = "cli")]
    if let Some(cmd) = command
        && !matches!(cmd, crate::cli::Commands::Serve)
    {
        return Mode::Cli;
    }

    #[cfg(feature = "server")]
    {
        let _ = command;
        Mode::Server
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = command;
        Mode::Unknown
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::cli::Commands;

    #[test]
    fn test_detect_mode_defaults_to_server() {
        assert_eq!(detect_mode(None), Mode::Server);
        assert_eq!(detect_mode(Some(&Commands::Serve)), Mode::Server);
    }

    #[test]
    fn test_detect_mode_cli_commands() {
        assert_eq!(detect_mode(Some(&Commands::Migrate)), Mode::Cli);
        assert_eq!(
            detect_mode(Some(&Commands::List { drafts: false })),
            Mode::Cli
        );
    }
}
