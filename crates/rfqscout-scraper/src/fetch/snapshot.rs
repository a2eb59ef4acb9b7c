//! Listing pages saved to disk as `page_<n>.html`.

use std::path::{Path, PathBuf};

use super::{PageFetcher, PageRequest, RenderedPage};
use crate::error::FetchError;

/// Path of the snapshot file for `page` inside `dir`.
#[must_use]
pub fn snapshot_path(dir: &Path, page: u32) -> PathBuf {
    dir.join(format!("page_{page}.html"))
}

/// Writes a fetched page to `dir`. Failures are logged, not propagated.
pub(super) async fn save_snapshot(dir: &Path, page: u32, html: &str) {
    let path = snapshot_path(dir, page);
    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, html).await
    }
    .await;

    match result {
        Ok(()) => tracing::debug!(page, path = %path.display(), "saved page snapshot"),
        Err(e) => tracing::warn!(
            page,
            path = %path.display(),
            error = %e,
            "failed to save page snapshot"
        ),
    }
}

/// Replays listing pages from a directory of saved snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotPageFetcher {
    dir: PathBuf,
}

impl SnapshotPageFetcher {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PageFetcher for SnapshotPageFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<RenderedPage, FetchError> {
        let path = snapshot_path(&self.dir, request.page);
        let html = match tokio::fs::read_to_string(&path).await {
            Ok(html) => html,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::MissingSnapshot {
                    page: request.page,
                    path,
                });
            }
            Err(source) => return Err(FetchError::Io { path, source }),
        };

        Ok(RenderedPage {
            page: request.page,
            url: request.url.clone(),
            html,
        })
    }
}
