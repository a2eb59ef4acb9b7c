//! `scrape` and `extract` command handlers.
//!
//! Page and card failures are logged and summarised rather than propagated;
//! only configuration and output failures end the command with an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use rfqscout_core::AppConfig;
use rfqscout_scraper::{
    HttpPageFetcher, LeadExtractor, ListingUrl, PageProcessor, PaginationConfig,
    PaginationController, RenderedPage, RunReport, SnapshotPageFetcher,
};

use crate::output::{write_records, OutputFormat};

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Highest page index to fetch (overrides `RFQSCOUT_MAX_PAGES`)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Output file (overrides `RFQSCOUT_OUTPUT_PATH`)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Replay `page_<n>.html` files from this directory instead of fetching
    #[arg(long, conflicts_with = "snapshot_dir")]
    pub from_dir: Option<PathBuf>,

    /// Save every fetched page as `page_<n>.html` in this directory
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,
}

fn build_processor(config: &AppConfig) -> anyhow::Result<PageProcessor> {
    let scraping_date = chrono::Local::now().date_naive();
    let extractor = LeadExtractor::new(&config.site_origin, scraping_date)?;
    Ok(PageProcessor::new(extractor))
}

fn pagination_config(config: &AppConfig, args: &ScrapeArgs) -> anyhow::Result<PaginationConfig> {
    let listing = ListingUrl::new(config.listing_url_template.clone())?;
    let max_pages = args.max_pages.unwrap_or(config.max_pages);
    Ok(PaginationConfig::new(listing, max_pages)
        .with_fetch_timeout(Duration::from_secs(config.fetch_timeout_secs))
        .with_page_delay(Duration::from_millis(config.page_delay_ms))
        .with_empty_page_retries(config.empty_page_retries))
}

pub async fn run_scrape(config: &AppConfig, args: &ScrapeArgs) -> anyhow::Result<()> {
    let processor = build_processor(config)?;
    let pagination = pagination_config(config, args)?;

    let report = if let Some(dir) = &args.from_dir {
        tracing::info!(dir = %dir.display(), "replaying saved listing pages");
        let fetcher = SnapshotPageFetcher::new(dir);
        PaginationController::new(fetcher, processor, pagination)
            .run()
            .await
    } else {
        let mut fetcher = HttpPageFetcher::new(
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )?;
        if let Some(dir) = args.snapshot_dir.as_ref().or(config.snapshot_dir.as_ref()) {
            fetcher = fetcher.with_snapshot_dir(dir);
        }
        PaginationController::new(fetcher, processor, pagination)
            .run()
            .await
    };

    log_report(&report);

    if report.records.is_empty() {
        println!("No data scraped.");
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path.clone());
    write_records(args.format, &path, &report.records)
        .with_context(|| format!("failed to write leads to {}", path.display()))?;

    println!(
        "Scraped {} RFQs across {} pages. Saved to {}.",
        report.records.len(),
        report.pages_processed,
        path.display()
    );
    Ok(())
}

fn log_report(report: &RunReport) {
    if !report.skipped_pages.is_empty() {
        let pages: Vec<u32> = report.skipped_pages.iter().map(|s| s.page).collect();
        tracing::warn!(?pages, "some pages could not be fetched");
    }
    if report.failed_cards > 0 {
        tracing::warn!(failed_cards = report.failed_cards, "some RFQ cards were skipped");
    }
    tracing::info!(
        records = report.records.len(),
        pages = report.pages_processed,
        stop = %report.stop_reason,
        "scrape finished"
    );
}

/// Runs the extractor over one saved page and prints the records.
pub fn run_extract(config: &AppConfig, file: &Path) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let page = RenderedPage {
        page: 1,
        url: file.display().to_string(),
        html,
    };

    let result = build_processor(config)?.process(&page);
    if result.failed_cards() > 0 {
        tracing::warn!(
            failed_cards = result.failed_cards(),
            cards = result.cards_found,
            "some RFQ cards were skipped"
        );
    }

    println!("{}", serde_json::to_string_pretty(&result.records)?);
    Ok(())
}
