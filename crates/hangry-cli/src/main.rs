mod commands;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hangry_core::Environment;
use hangry_reputation::TokenCache;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hangry")]
#[command(about = "Restaurant search across a listing and a reputation provider")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search restaurants near an address, enriched with ratings
    Search {
        /// What to look for (e.g., "thai", "burrito")
        #[arg(long)]
        term: String,
        /// Street address to search from
        #[arg(long, env = "HANGRY_ADDRESS")]
        address: String,
    },
    /// Show menu, reviews, and photos for one restaurant
    Detail {
        /// Restaurant name as listed
        #[arg(long)]
        name: String,
        /// Street address to search from
        #[arg(long, env = "HANGRY_ADDRESS")]
        address: String,
    },
    /// Count restaurants per cuisine near an address
    Cuisines {
        /// Street address to search from
        #[arg(long, env = "HANGRY_ADDRESS")]
        address: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `HANGRY_ADDRESS` from `.env` backs `--address`.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = hangry_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let verbose = verbose_logs(&config.env);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_line_number(verbose)
        .with_ansi(verbose)
        .init();

    tracing::debug!(?config, "configuration loaded");

    let tokens = Arc::new(TokenCache::new(Duration::from_secs(
        config.token_refresh_margin_secs,
    )));
    let aggregator = commands::build_aggregator(&config, tokens)?;

    let result = commands::run(&aggregator, cli.command).await;
    aggregator.reputation().shutdown().await;
    result
}

/// Development logs are verbose (targets and line numbers) and colored.
fn verbose_logs(env: &Environment) -> bool {
    matches!(env, Environment::Development)
}
