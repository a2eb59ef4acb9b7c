use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Setup-time failures: the run cannot start with this configuration.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid site origin \"{origin}\": {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("invalid listing URL template \"{template}\": {reason}")]
    InvalidListingUrl { template: String, reason: String },
}

/// A single listing page could not be fetched. The run skips the page and
/// continues with the next index.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `retry_after_secs` is 0 when the server sent no usable `Retry-After`.
    #[error("rate limited by {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("fetching page {page} timed out after {timeout:?}")]
    Timeout { page: u32, timeout: Duration },

    #[error("no snapshot for page {page} at {}", .path.display())]
    MissingSnapshot { page: u32, path: PathBuf },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single card could not be turned into a lead record. The card is
/// skipped and counted as a failure for its page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardExtractionError {
    #[error("card has no rendered text")]
    EmptyCard,
}
