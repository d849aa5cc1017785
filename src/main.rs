use clap::Parser;
use tracing::error;

use inkpost::cli::Cli;
use inkpost::config::{get_config, init_config_from};
use inkpost::runtime::modes::{Mode, detect_mode};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    let config = get_config();
    // guard 需要存活到进程结束，否则异步日志不会刷新
    let _log_guard = inkpost::system::logging::init_logging(&config)?;

    match detect_mode(cli.command.as_ref()) {
        #[cfg(feature = "server")]
        Mode::Server => inkpost::runtime::modes::run_server().await,

        #[cfg(feature = "cli")]
        Mode::Cli => {
            let Some(cmd) = cli.command else {
                return Ok(());
            };
            if let Err(e) = inkpost::runtime::modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }

        Mode::Unknown => {
            error!("No execution mode available: build with the `server` feature");
            std::process::exit(1);
        }
    }
}
