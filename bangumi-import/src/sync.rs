//! Replace the local list with the remote catalog.
//!
//! The fetch completes before the store is touched, so a failed first page
//! leaves the local list exactly as it was. Once the fetch succeeds the
//! table is cleared and refilled; the clear is not undone if the refill is
//! rolled back.

use bangumi_core::BangumiItem;
use bangumi_db::Store;
use bangumi_fetch::{FetchProgress, PageSource, fetch_all};
use serde::Serialize;

use crate::error::ImportError;

/// Statistics from a single replace-all.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub removed: usize,
    pub inserted: usize,
}

/// Clear the table and insert `items` as one batch.
pub fn replace_all(store: &mut Store, items: &[BangumiItem]) -> Result<SyncReport, ImportError> {
    let removed = store.delete_all()?;
    log::info!("Cleared {} local row(s)", removed);

    let outcome = store.insert_batch(items)?;
    if !outcome.success {
        log::error!(
            "Remote batch rejected: {} of {} row(s) failed, local list is now empty",
            outcome.error_count,
            items.len()
        );
        return Err(ImportError::BatchRejected {
            error_count: outcome.error_count,
            total: items.len(),
        });
    }

    log::info!("Stored {} remote item(s)", outcome.inserted);
    Ok(SyncReport {
        removed,
        inserted: outcome.inserted,
    })
}

/// Fetch every page from `source`, then [`replace_all`].
pub async fn sync_from_remote<S: PageSource>(
    store: &mut Store,
    source: &S,
    progress: &dyn FetchProgress,
) -> Result<SyncReport, ImportError> {
    let items = fetch_all(source, progress).await?;
    replace_all(store, &items)
}
