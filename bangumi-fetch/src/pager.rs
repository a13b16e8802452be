//! Walk the remote catalog page by page.
//!
//! Pages are requested strictly one after another. Page 1 decides how many
//! pages exist and must succeed; any later page may fail without aborting
//! the walk, its items are simply missing from the result.

use std::future::Future;

use bangumi_core::BangumiItem;

use crate::client::CatalogClient;
use crate::error::FetchError;
use crate::settings::Settings;
use crate::types::PageEnvelope;

/// Something that can return one page of the collection listing.
pub trait PageSource {
    /// Items requested per page; used to estimate the total.
    fn page_size(&self) -> u32;

    /// Fetch the 1-based `page`.
    fn fetch_page(
        &self,
        page: u32,
    ) -> impl Future<Output = Result<PageEnvelope, FetchError>> + Send;
}

/// Receives a percentage after every page that was fetched successfully.
///
/// Notifications are best effort: the receiver may already be gone.
pub trait FetchProgress {
    fn on_progress(&self, percent: u8);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_progress(&self, _percent: u8) {}
}

/// `fetched / estimated_total` as a whole percentage in `0..=100`.
///
/// `estimated_total` is `total_pages * page_size`, an upper bound when the
/// last page is partial, so this can stay below 100 until the walk ends.
pub fn progress_percent(fetched: usize, estimated_total: usize) -> u8 {
    if estimated_total == 0 {
        return 100;
    }
    let ratio = fetched as f64 / estimated_total as f64 * 100.0;
    ratio.round().clamp(0.0, 100.0) as u8
}

/// Collect every item the source will give us, in page order.
///
/// Fails only when page 1 cannot be fetched or reports a non-success code.
pub async fn fetch_all<S: PageSource>(
    source: &S,
    progress: &dyn FetchProgress,
) -> Result<Vec<BangumiItem>, FetchError> {
    let first = source
        .fetch_page(1)
        .await
        .map_err(|e| FetchError::RemoteMetadata(format!("page 1: {}", e)))?;
    if !first.is_success() {
        return Err(FetchError::RemoteMetadata(format!(
            "page 1 returned code {}: {}",
            first.code,
            first.message()
        )));
    }

    let data = first.into_data();
    let total_pages = data.total_pages;
    let estimated_total = total_pages as usize * source.page_size() as usize;
    log::info!(
        "Remote catalog has {} page(s), about {} item(s)",
        total_pages,
        estimated_total
    );

    let mut items = data.list;
    progress.on_progress(progress_percent(items.len(), estimated_total));

    let mut failed_pages = 0;
    for page in 2..=total_pages {
        match source.fetch_page(page).await {
            Ok(envelope) if envelope.is_success() => {
                items.extend(envelope.into_data().list);
                progress.on_progress(progress_percent(items.len(), estimated_total));
            }
            Ok(envelope) => {
                log::warn!(
                    "Page {} returned code {} ({}), skipping",
                    page,
                    envelope.code,
                    envelope.message()
                );
                failed_pages += 1;
            }
            Err(e) => {
                log::warn!("Page {} failed: {}, skipping", page, e);
                failed_pages += 1;
            }
        }
    }

    if failed_pages > 0 {
        log::warn!(
            "Fetched {} item(s); {} of {} page(s) were skipped",
            items.len(),
            failed_pages,
            total_pages
        );
    } else {
        log::info!("Fetched {} item(s)", items.len());
    }
    Ok(items)
}

/// Validate `settings`, build an HTTP client and fetch the whole catalog.
pub async fn fetch_catalog(
    settings: &Settings,
    progress: &dyn FetchProgress,
) -> Result<Vec<BangumiItem>, FetchError> {
    let client = CatalogClient::new(settings.remote()?)?;
    fetch_all(&client, progress).await
}

#[cfg(test)]
#[path = "tests/pager_tests.rs"]
mod tests;
