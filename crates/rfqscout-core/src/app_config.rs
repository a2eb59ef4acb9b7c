use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Production runs log one JSON object per line; other environments
    /// use the human-readable format.
    #[must_use]
    pub fn json_logs(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for a scrape run, resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Listing search URL with a `{page}` placeholder for the page index.
    pub listing_url_template: String,
    /// Origin that relative inquiry links are resolved against.
    pub site_origin: String,
    pub max_pages: u32,
    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
    /// Upper bound on one page fetch, retries included.
    pub fetch_timeout_secs: u64,
    pub page_delay_ms: u64,
    /// Extra fetches of a page that rendered zero cards before the run stops.
    pub empty_page_retries: u32,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// When set, every fetched page's HTML is saved here as `page_<n>.html`.
    pub snapshot_dir: Option<PathBuf>,
}
