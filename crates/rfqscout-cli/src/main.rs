mod output;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rfqscout")]
#[command(about = "Extract buyer RFQ leads from marketplace listing pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape listing pages and write the leads to a file
    Scrape(scrape::ScrapeArgs),
    /// Extract leads from one saved listing page and print them as JSON
    Extract {
        /// Saved HTML of a rendered listing page
        #[arg(value_name = "HTML_FILE")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = rfqscout_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);
    if config.env.json_logs() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Scrape(args) => scrape::run_scrape(&config, &args).await,
        Commands::Extract { file } => scrape::run_extract(&config, &file),
    }
}
