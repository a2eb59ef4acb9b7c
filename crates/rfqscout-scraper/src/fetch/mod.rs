//! Page sources for the pagination loop.
//!
//! [`PageFetcher`] hides the rendering backend. Two implementations ship
//! with the crate: [`HttpPageFetcher`] for live listing pages and
//! [`SnapshotPageFetcher`] for replaying pages saved to disk.

mod http;
mod snapshot;

use std::future::Future;

use crate::error::{FetchError, ScraperError};

pub use http::HttpPageFetcher;
pub use snapshot::{snapshot_path, SnapshotPageFetcher};

const PAGE_PLACEHOLDER: &str = "{page}";

/// One page to fetch: its 1-based index and the listing URL for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub url: String,
}

/// The fully rendered HTML of one listing page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: u32,
    pub url: String,
    pub html: String,
}

/// Produces the rendered content of a listing page.
pub trait PageFetcher {
    /// Fetches the page described by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the page cannot be retrieved. The caller
    /// treats this as a skipped page, not a failed run.
    fn fetch(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<RenderedPage, FetchError>> + Send;
}

/// Listing search endpoint with a `{page}` placeholder, e.g.
/// `https://host/rfq/search?country=AE&page={page}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingUrl {
    template: String,
}

impl ListingUrl {
    /// Validates the template and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidListingUrl`] if the template has no
    /// `{page}` placeholder or does not form a valid absolute URL.
    pub fn new(template: impl Into<String>) -> Result<Self, ScraperError> {
        let template = template.into();
        if !template.contains(PAGE_PLACEHOLDER) {
            return Err(ScraperError::InvalidListingUrl {
                template,
                reason: "missing {page} placeholder".to_owned(),
            });
        }
        let listing = Self { template };
        if let Err(e) = reqwest::Url::parse(&listing.page_url(1)) {
            return Err(ScraperError::InvalidListingUrl {
                template: listing.template,
                reason: e.to_string(),
            });
        }
        Ok(listing)
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn page_url(&self, page: u32) -> String {
        self.template.replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    #[must_use]
    pub fn request(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            url: self.page_url(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_substitutes_index() {
        let listing =
            ListingUrl::new("https://rfq.example.com/search?country=AE&recently=Y&page={page}")
                .unwrap();
        assert_eq!(
            listing.page_url(3),
            "https://rfq.example.com/search?country=AE&recently=Y&page=3"
        );
        assert_eq!(
            listing.request(1),
            PageRequest {
                page: 1,
                url: "https://rfq.example.com/search?country=AE&recently=Y&page=1".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let result = ListingUrl::new("https://rfq.example.com/search?page=1");
        assert!(matches!(
            result,
            Err(ScraperError::InvalidListingUrl { .. })
        ));
    }

    #[test]
    fn rejects_relative_template() {
        let result = ListingUrl::new("/search?page={page}");
        assert!(matches!(
            result,
            Err(ScraperError::InvalidListingUrl { .. })
        ));
    }
}
