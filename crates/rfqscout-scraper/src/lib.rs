pub mod card;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod page;
pub mod pagination;
mod retry;

pub use card::{locate_cards, Card, CardAnchor, MARKER_PHRASE};
pub use error::{CardExtractionError, FetchError, ScraperError};
pub use extract::{buyer_name_after_date, FieldRules, LeadExtractor, LeadFlag};
pub use fetch::{
    snapshot_path, HttpPageFetcher, ListingUrl, PageFetcher, PageRequest, RenderedPage,
    SnapshotPageFetcher,
};
pub use page::{CardFailure, PageProcessor, PageResult};
pub use pagination::{PaginationConfig, PaginationController, RunReport, SkippedPage, StopReason};
