//! Live listing pages over HTTP.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;

use super::snapshot::save_snapshot;
use super::{PageFetcher, PageRequest, RenderedPage};
use crate::error::{FetchError, ScraperError};
use crate::retry::retry_with_backoff;

/// Fetches listing pages with `reqwest`.
///
/// Non-2xx responses become typed [`FetchError`]s. Transport errors, 429
/// and 5xx responses are retried with exponential backoff up to
/// `max_retries` additional attempts.
pub struct HttpPageFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
    snapshot_dir: Option<PathBuf>,
}

impl HttpPageFetcher {
    /// Creates a fetcher with the given request timeout, `User-Agent` and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Client`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
            snapshot_dir: None,
        })
    }

    /// Saves each fetched page as `page_<n>.html` under `dir`.
    #[must_use]
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .header(reqwest::header::CACHE_CONTROL, "no-cache")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(0);
                    return Err(FetchError::RateLimited {
                        url,
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(FetchError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<RenderedPage, FetchError> {
        tracing::debug!(page = request.page, url = %request.url, "fetching listing page");
        let html = self.get_html(&request.url).await?;

        if let Some(dir) = &self.snapshot_dir {
            save_snapshot(dir, request.page, &html).await;
        }

        Ok(RenderedPage {
            page: request.page,
            url: request.url.clone(),
            html,
        })
    }
}
