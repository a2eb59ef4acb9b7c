//! Page-index pagination over the RFQ listing.
//!
//! Pages `1..=max_pages` are fetched one at a time, in order:
//!
//! - a fetch error skips the page and the run moves on to the next index;
//! - a page that yields no records is read as the end of the listing and
//!   stops the run, after `empty_page_retries` extra fetches of that page;
//! - otherwise the page's records are appended and the next index follows.
//!
//! The empty-page rule assumes results are exhausted monotonically. A page
//! that transiently renders zero cards is indistinguishable from the end of
//! the data unless retries are configured.

use std::fmt;
use std::time::Duration;

use rfqscout_core::LeadRecord;

use crate::error::FetchError;
use crate::fetch::{ListingUrl, PageFetcher, PageRequest, RenderedPage};
use crate::page::{PageProcessor, PageResult};

/// Fixed inputs of a pagination run.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub listing: ListingUrl,
    pub max_pages: u32,
    /// Bound on a single fetch. `None` waits as long as the fetcher does.
    pub fetch_timeout: Option<Duration>,
    /// Pause before every fetch except the first.
    pub page_delay: Duration,
    pub empty_page_retries: u32,
}

impl PaginationConfig {
    #[must_use]
    pub fn new(listing: ListingUrl, max_pages: u32) -> Self {
        Self {
            listing,
            max_pages,
            fetch_timeout: None,
            page_delay: Duration::ZERO,
            empty_page_retries: 0,
        }
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    #[must_use]
    pub fn with_empty_page_retries(mut self, retries: u32) -> Self {
        self.empty_page_retries = retries;
        self
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The page produced no records.
    EmptyPage { page: u32 },
    MaxPagesReached { max_pages: u32 },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EmptyPage { page } => write!(f, "no data found on page {page}"),
            StopReason::MaxPagesReached { max_pages } => {
                write!(f, "reached the page limit of {max_pages}")
            }
        }
    }
}

/// A page abandoned because its fetch failed.
#[derive(Debug)]
pub struct SkippedPage {
    pub page: u32,
    pub url: String,
    pub error: FetchError,
}

/// Everything a run produced: records in page order, then card order.
#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<LeadRecord>,
    /// Pages fetched and processed, the terminating empty page included.
    pub pages_processed: u32,
    pub skipped_pages: Vec<SkippedPage>,
    pub failed_cards: usize,
    pub stop_reason: StopReason,
}

pub struct PaginationController<F> {
    fetcher: F,
    processor: PageProcessor,
    config: PaginationConfig,
}

impl<F: PageFetcher> PaginationController<F> {
    #[must_use]
    pub fn new(fetcher: F, processor: PageProcessor, config: PaginationConfig) -> Self {
        Self {
            fetcher,
            processor,
            config,
        }
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[must_use]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Runs the pagination loop to completion. Page and card failures are
    /// collected in the report; they never abort the run.
    pub async fn run(&self) -> RunReport {
        let mut records = Vec::new();
        let mut pages_processed = 0u32;
        let mut skipped_pages = Vec::new();
        let mut failed_cards = 0usize;
        let mut first_fetch = true;

        for page in 1..=self.config.max_pages {
            let request = self.config.listing.request(page);
            tracing::info!(page, url = %request.url, "scraping page");

            let outcome = self.fetch_page(&request, &mut first_fetch).await;
            let result = match outcome {
                Ok(result) => result,
                Err(error) => {
                    tracing::warn!(page, url = %request.url, error = %error, "failed to scrape page");
                    skipped_pages.push(SkippedPage {
                        page,
                        url: request.url,
                        error,
                    });
                    continue;
                }
            };

            pages_processed += 1;
            failed_cards += result.failed_cards();

            if result.is_empty() {
                tracing::info!(page, "no data found on page, stopping");
                return RunReport {
                    records,
                    pages_processed,
                    skipped_pages,
                    failed_cards,
                    stop_reason: StopReason::EmptyPage { page },
                };
            }

            tracing::info!(
                page,
                records = result.records.len(),
                failed_cards = result.failed_cards(),
                "page processed"
            );
            records.extend(result.records);
        }

        RunReport {
            records,
            pages_processed,
            skipped_pages,
            failed_cards,
            stop_reason: StopReason::MaxPagesReached {
                max_pages: self.config.max_pages,
            },
        }
    }

    /// Fetches and processes one page, re-fetching an empty result up to
    /// `empty_page_retries` times. A re-fetch that fails keeps the empty
    /// result already seen.
    async fn fetch_page(
        &self,
        request: &PageRequest,
        first_fetch: &mut bool,
    ) -> Result<PageResult, FetchError> {
        let mut attempt = 0u32;
        let mut empty: Option<PageResult> = None;
        loop {
            if !*first_fetch && !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
            *first_fetch = false;

            let rendered = match (self.fetch_with_timeout(request).await, empty.take()) {
                (Ok(rendered), _) => rendered,
                (Err(error), Some(previous)) => {
                    tracing::warn!(
                        page = request.page,
                        error = %error,
                        "re-fetch of empty page failed, keeping the empty result"
                    );
                    return Ok(previous);
                }
                (Err(error), None) => return Err(error),
            };
            let result = self.processor.process(&rendered);
            if !result.is_empty() || attempt >= self.config.empty_page_retries {
                return Ok(result);
            }
            empty = Some(result);
            attempt += 1;
            tracing::info!(
                page = request.page,
                attempt,
                retries = self.config.empty_page_retries,
                "page rendered no records, fetching it again"
            );
        }
    }

    async fn fetch_with_timeout(&self, request: &PageRequest) -> Result<RenderedPage, FetchError> {
        let Some(timeout) = self.config.fetch_timeout else {
            return self.fetcher.fetch(request).await;
        };
        tokio::time::timeout(timeout, self.fetcher.fetch(request))
            .await
            .map_err(|_| FetchError::Timeout {
                page: request.page,
                timeout,
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fetch_timeout_disables_the_bound() {
        let listing = ListingUrl::new("https://rfq.example.com/search?page={page}").unwrap();
        let config = PaginationConfig::new(listing, 3).with_fetch_timeout(Duration::ZERO);
        assert!(config.fetch_timeout.is_none());
    }

    #[test]
    fn stop_reason_messages() {
        assert_eq!(
            StopReason::EmptyPage { page: 3 }.to_string(),
            "no data found on page 3"
        );
        assert_eq!(
            StopReason::MaxPagesReached { max_pages: 5 }.to_string(),
            "reached the page limit of 5"
        );
    }
}
