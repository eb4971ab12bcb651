use clap::Parser;

use poll_analytics::cli::Cli;
use poll_analytics::config::StaticConfig;
use poll_analytics::runtime::modes::{self, Mode};
use poll_analytics::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = StaticConfig::load(cli.config.as_deref());

    match modes::detect_mode(cli.command.as_ref()) {
        Mode::Server => {
            // guard 需要存活到进程退出，否则缓冲日志会丢失
            let _guard = init_logging(&config.logging)
                .map_err(|e| anyhow::anyhow!(e.format_simple()))?;
            tracing::info!("poll-analytics v{}", env!("CARGO_PKG_VERSION"));
            modes::run_server(&config).await
        }
        Mode::Cli => {
            let Some(command) = cli.command else {
                return Ok(());
            };
            if let Err(e) = modes::run_cli(command, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
