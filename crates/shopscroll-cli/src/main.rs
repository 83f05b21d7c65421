mod browse;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::browse::BrowseCommands;

#[derive(Debug, Parser)]
#[command(name = "shopscroll-cli")]
#[command(about = "Browse a Shopify storefront as an infinite-scroll feed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scroll through a storefront listing, printing items as they load
    Browse {
        #[command(subcommand)]
        command: BrowseCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(Commands::Browse { command }) = cli.command else {
        println!("shopscroll-cli: nothing to do, try `shopscroll-cli browse --help`");
        return Ok(());
    };

    let config = shopscroll_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // Items go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    browse::run_browse(&config, command).await
}

#[cfg(test)]
mod tests;
