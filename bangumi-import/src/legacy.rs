//! One-time migration from the flat JSON snapshot that predates the database.

use std::path::Path;

use bangumi_core::BangumiItem;
use bangumi_db::Store;
use serde::Serialize;

use crate::error::ImportError;

/// What [`migrate_legacy_snapshot`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum MigrationOutcome {
    /// There was no snapshot file.
    NoSnapshot,
    /// The store already had rows, so the snapshot was left alone.
    AlreadyPopulated { rows: i64 },
    Imported { rows: usize },
}

/// Read the snapshot at `path`. `Ok(None)` when the file does not exist.
pub fn read_snapshot(path: &Path) -> Result<Option<Vec<BangumiItem>>, ImportError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ImportError::LegacyRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let items = serde_json::from_str(&contents).map_err(|source| ImportError::LegacyFormat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(items))
}

/// Copy the snapshot at `path` into an empty store.
///
/// A store that already holds rows is never touched, so running this twice
/// is harmless.
pub fn migrate_legacy_snapshot(
    store: &mut Store,
    path: &Path,
) -> Result<MigrationOutcome, ImportError> {
    let rows = store.count()?;
    if rows > 0 {
        log::info!("Store already has {} row(s), skipping legacy migration", rows);
        return Ok(MigrationOutcome::AlreadyPopulated { rows });
    }

    let Some(items) = read_snapshot(path)? else {
        log::info!("No legacy snapshot at {}", path.display());
        return Ok(MigrationOutcome::NoSnapshot);
    };

    let inserted = insert_snapshot(store, &items)?;
    log::info!(
        "Migrated {} item(s) from legacy snapshot {}",
        inserted,
        path.display()
    );
    Ok(MigrationOutcome::Imported { rows: inserted })
}

/// Read the list, falling back to the legacy snapshot when the store can't
/// be read.
///
/// The snapshot is imported only into an empty table, then the list is
/// re-read. If the table already holds (unreadable) rows, or the import or
/// re-read fails, the snapshot items are returned as they are and the store
/// is left unchanged. With no snapshot the result is an empty list.
pub fn load_or_migrate(
    store: &mut Store,
    legacy_path: &Path,
) -> Result<Vec<BangumiItem>, ImportError> {
    let err = match store.get_all() {
        Ok(items) => return Ok(items),
        Err(e) => e,
    };
    log::warn!("Reading the store failed ({}), trying legacy snapshot", err);

    let Some(items) = read_snapshot(legacy_path)? else {
        log::info!("No legacy snapshot at {}", legacy_path.display());
        return Ok(Vec::new());
    };

    match store.count() {
        Ok(0) => match import_and_reread(store, &items) {
            Ok(stored) => return Ok(stored),
            Err(e) => log::warn!("Legacy import failed ({}), serving snapshot directly", e),
        },
        Ok(rows) => log::warn!(
            "Store holds {} unreadable row(s), serving snapshot without importing",
            rows
        ),
        Err(e) => log::warn!("Store unavailable ({}), serving snapshot directly", e),
    }
    Ok(items)
}

fn import_and_reread(
    store: &mut Store,
    items: &[BangumiItem],
) -> Result<Vec<BangumiItem>, ImportError> {
    insert_snapshot(store, items)?;
    Ok(store.get_all()?)
}

fn insert_snapshot(store: &mut Store, items: &[BangumiItem]) -> Result<usize, ImportError> {
    let outcome = store.insert_batch(items)?;
    if !outcome.success {
        return Err(ImportError::BatchRejected {
            error_count: outcome.error_count,
            total: items.len(),
        });
    }
    Ok(outcome.inserted)
}
