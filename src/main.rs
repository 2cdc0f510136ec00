mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use pantort::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = match args.config {
                Some(path) => Config::load_with_secrets(path)?,
                None => Config::load()?,
            };
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }

            pantort::observability::init_tracing(&config.logging.level);
            tracing::info!(
                level = %config.logging.level,
                "INIT - Pan-Tort application initializing"
            );

            pantort::api::run(config).await?
        }
    }

    Ok(())
}
