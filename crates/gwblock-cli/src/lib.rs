//! CLI wiring: argument parsing, config, logging, and command dispatch.

pub mod args;
pub mod config;
pub mod sources;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use config::{Config, Credentials};
use gwblock_client::GatewayClient;
use gwblock_engine::SyncManager;
use sources::SourceLoader;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load(&cli.config)?;
    let credentials = Credentials::from_env()?;

    let client = GatewayClient::new(credentials.token, credentials.account_id);
    let manager = SyncManager::new(client, &config.adlist_name);

    match cli.command {
        Commands::Run => {
            let loader = SourceLoader::new();
            let block = loader
                .corpus(
                    &config.adlist_urls,
                    &config.dynamic_blacklist,
                    "DYNAMIC_BLACKLIST",
                )
                .await?;
            let allow = loader
                .corpus(
                    &config.whitelist_urls,
                    &config.dynamic_whitelist,
                    "DYNAMIC_WHITELIST",
                )
                .await?;
            manager.run(&block, &allow).await?;
        }
        Commands::Leave => manager.leave().await?,
    }

    Ok(())
}
