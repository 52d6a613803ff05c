mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use acs_core::Sport;

#[derive(Debug, Parser)]
#[command(name = "acs-cli")]
#[command(about = "Fetch, normalize and sanitize ACS content")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hero slides, latest news and live events from the home page
    Home,
    /// League table for one sport
    Standings {
        #[arg(long, default_value = "futsal")]
        sport: Sport,
    },
    /// Weekly matches for one sport
    Matches {
        #[arg(long, default_value = "futsal")]
        sport: Sport,
    },
    /// Sanitized article page for a slug
    News { slug: String },
    /// Plain-text article page for a slug
    Article { slug: String },
    /// Sanitize an HTML file (or stdin) and print the result
    Sanitize { file: Option<PathBuf> },
    /// Prime the disk cache for every listing page
    Warm,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = acs_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = acs_scraper::AcsService::from_config(&config)?;
    tracing::debug!(env = %config.env, base_url = %config.base_url, "acs-cli starting");

    match cli.command {
        Commands::Home => commands::print_json(&service.get_home_content().await),
        Commands::Standings { sport } => {
            commands::print_json(&service.get_standings_content(sport).await)
        }
        Commands::Matches { sport } => {
            commands::print_json(&service.get_matches_content(sport).await)
        }
        Commands::News { slug } => commands::run_news(&service, &slug).await,
        Commands::Article { slug } => commands::run_article(&service, &slug).await,
        Commands::Sanitize { file } => commands::run_sanitize(&service, file.as_deref()).await,
        Commands::Warm => commands::run_warm(&service).await,
    }
}
