//! Request/response surface for the UI layer.
//!
//! Every operation returns an [`ApiResponse`]; nothing here panics or
//! returns a bare error. Store calls run on the blocking pool while the
//! shared handle is locked, so they are serialized against each other.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bangumi_core::{ApiResponse, BangumiItem};
use bangumi_db::{OrderOutcome, Store};
use bangumi_fetch::{FetchError, FetchProgress, PageSource, Settings, fetch_all, fetch_catalog};

use crate::error::ImportError;
use crate::export;
use crate::legacy::{self, MigrationOutcome};
use crate::sync::{self, SyncReport};

pub struct Library {
    store: Arc<Mutex<Store>>,
    settings: Settings,
}

impl Library {
    pub fn new(store: Store, settings: Settings) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            settings,
        }
    }

    /// Open the store named by `settings` (lazily, on first use).
    pub fn from_settings(settings: Settings) -> Self {
        let store = Store::new(settings.db_path());
        Self::new(store, settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run `f` against the locked store on the blocking pool.
    async fn with_store<T, F>(&self, f: F) -> Result<T, ImportError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Store) -> Result<T, ImportError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut guard = store
                .lock()
                .map_err(|_| ImportError::Worker("store lock poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| ImportError::Worker(e.to_string()))?
    }

    /// All items, ordered for display.
    pub async fn get_items(&self) -> ApiResponse<Vec<BangumiItem>> {
        self.with_store(|store| Ok(store.get_all()?)).await.into()
    }

    /// The item with `id`, if any.
    pub async fn find_item(&self, id: i64) -> ApiResponse<Option<BangumiItem>> {
        self.with_store(move |store| Ok(store.find_by_id(id)?))
            .await
            .into()
    }

    /// Like [`Library::get_items`], falling back to the legacy snapshot when
    /// the store can't be read.
    pub async fn load_items(&self) -> ApiResponse<Vec<BangumiItem>> {
        let legacy_path = self.settings.legacy_snapshot_path();
        self.with_store(move |store| legacy::load_or_migrate(store, &legacy_path))
            .await
            .into()
    }

    /// Fetch the configured catalog and replace the local list with it.
    pub async fn sync_from_remote(&self, progress: &dyn FetchProgress) -> ApiResponse<SyncReport> {
        let fetched = fetch_catalog(&self.settings, progress).await;
        self.replace_with(fetched).await
    }

    /// Replace the local list with everything `source` returns.
    pub async fn sync_with<S: PageSource>(
        &self,
        source: &S,
        progress: &dyn FetchProgress,
    ) -> ApiResponse<SyncReport> {
        let fetched = fetch_all(source, progress).await;
        self.replace_with(fetched).await
    }

    async fn replace_with(
        &self,
        fetched: Result<Vec<BangumiItem>, FetchError>,
    ) -> ApiResponse<SyncReport> {
        let items = match fetched {
            Ok(items) => items,
            Err(e) => {
                log::error!("Sync aborted, local list untouched: {}", e);
                return ApiResponse::from_error(&e);
            }
        };
        self.with_store(move |store| sync::replace_all(store, &items))
            .await
            .into()
    }

    /// Overwrite the editable fields of an existing item.
    ///
    /// An id that matches no row is reported as an unsuccessful response
    /// without an error kind.
    pub async fn save_item(&self, item: BangumiItem) -> ApiResponse {
        let id = item.id;
        match self.with_store(move |store| Ok(store.update_one(&item)?)).await {
            Ok(true) => ApiResponse::done(),
            Ok(false) => {
                ApiResponse::rejected(format!("Bangumi id {} not found", id.unwrap_or_default()))
            }
            Err(e) => ApiResponse::from_error(&e),
        }
    }

    /// Insert a new item; the response carries its id.
    pub async fn add_item(&self, item: BangumiItem) -> ApiResponse<i64> {
        self.with_store(move |store| Ok(store.insert_one(&item)?))
            .await
            .into()
    }

    /// Persist a new display order. Ids that match no row are skipped.
    pub async fn update_order(&self, sorted_ids: Vec<i64>) -> ApiResponse<OrderOutcome> {
        self.with_store(move |store| Ok(store.update_order(&sorted_ids)?))
            .await
            .into()
    }

    /// Export the current list. `None` means the user dismissed the save
    /// dialog; nothing is written and the response is marked cancelled.
    pub async fn export_json(&self, destination: Option<PathBuf>) -> ApiResponse<PathBuf> {
        let Some(path) = destination else {
            log::info!("Export cancelled");
            return ApiResponse::cancelled();
        };
        self.with_store(move |store| {
            let items = store.get_all()?;
            export::export_json(&items, &path)?;
            Ok(path)
        })
        .await
        .into()
    }

    /// Import the legacy snapshot (or the configured one) into an empty store.
    pub async fn migrate_legacy(&self, path: Option<PathBuf>) -> ApiResponse<MigrationOutcome> {
        let path = path.unwrap_or_else(|| self.settings.legacy_snapshot_path());
        self.with_store(move |store| legacy::migrate_legacy_snapshot(store, &path))
            .await
            .into()
    }

    /// Release the database connection. Later calls reopen it.
    pub async fn close(&self) {
        let result = self
            .with_store(|store| {
                store.close();
                Ok(())
            })
            .await;
        if let Err(e) = result {
            log::error!("Failed to close store: {}", e);
        }
    }
}
