//! Write operations on the `bangumi` table.

use bangumi_core::{BangumiItem, Classified, ErrorKind, Label};
use rusqlite::{Connection, ErrorCode, ffi, params};
use serde::Serialize;
use thiserror::Error;

use crate::schema::SchemaError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    Init(#[from] SchemaError),
    #[error("SQLite error: {0}")]
    Query(#[from] rusqlite::Error),
    #[error("Bangumi id {0} already exists")]
    DuplicateId(i64),
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Reorder rolled back at id {id}: {source}")]
    OrderUpdate {
        id: i64,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Labels could not be serialized: {0}")]
    Labels(#[from] serde_json::Error),
}

impl Classified for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Init(_) => ErrorKind::StoreInit,
            Self::Query(_) => ErrorKind::Query,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::Validation(_) => ErrorKind::Validation,
            Self::OrderUpdate { .. } => ErrorKind::OrderUpdate,
            Self::Labels(_) => ErrorKind::Serialization,
        }
    }
}

/// Result of a bulk insert. `error_count` is authoritative: when it is
/// non-zero nothing from the batch was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub success: bool,
    pub inserted: usize,
    pub error_count: usize,
}

/// Result of a reorder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OrderOutcome {
    pub updated: usize,
    /// Ids that matched no row and were passed over.
    pub skipped: Vec<i64>,
}

const INSERT_SQL: &str = "INSERT INTO bangumi (id, name, nameCN, summary, cover, url, labels)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Remove every row. First half of a replace-all cycle.
pub fn delete_all(conn: &Connection) -> Result<usize, StoreError> {
    let removed = conn.execute("DELETE FROM bangumi", [])?;
    log::info!("Deleted {} bangumi rows", removed);
    Ok(removed)
}

/// Insert items inside one transaction, all-or-nothing.
///
/// A failing row is counted and the loop carries on so the caller learns how
/// many rows were bad; any failure rolls the whole batch back. Rows with an
/// `id` keep it, rows without one get the next auto-increment value.
/// `sort_order` is never written here.
pub fn insert_batch(conn: &Connection, items: &[BangumiItem]) -> Result<BatchOutcome, StoreError> {
    if items.is_empty() {
        log::debug!("No bangumi rows to insert");
        return Ok(BatchOutcome {
            success: true,
            ..BatchOutcome::default()
        });
    }

    let tx = conn.unchecked_transaction()?;
    let mut error_count = 0;
    {
        let mut stmt = tx.prepare(INSERT_SQL)?;
        for item in items {
            let labels = labels_to_text(&item.labels)?;
            if let Err(e) = stmt.execute(params![
                item.id,
                item.name,
                item.name_cn,
                item.summary,
                item.cover,
                item.url,
                labels,
            ]) {
                log::error!(
                    "Insert failed for bangumi (id: {:?}, name: '{}'): {}",
                    item.id,
                    item.name,
                    e
                );
                error_count += 1;
            }
        }
    }

    if error_count == 0 {
        tx.commit()?;
        log::info!("Inserted {} bangumi rows", items.len());
        Ok(BatchOutcome {
            success: true,
            inserted: items.len(),
            error_count: 0,
        })
    } else {
        tx.rollback()?;
        log::warn!(
            "Batch insert rolled back after {} failed row(s) out of {}",
            error_count,
            items.len()
        );
        Ok(BatchOutcome {
            success: false,
            inserted: 0,
            error_count,
        })
    }
}

/// Insert a single row and return its id.
pub fn insert_one(conn: &Connection, item: &BangumiItem) -> Result<i64, StoreError> {
    let labels = labels_to_text(&item.labels)?;
    let result = conn.execute(
        INSERT_SQL,
        params![
            item.id,
            item.name,
            item.name_cn,
            item.summary,
            item.cover,
            item.url,
            labels,
        ],
    );

    match result {
        Ok(_) => {
            let id = conn.last_insert_rowid();
            log::info!("Inserted bangumi '{}' as id {}", item.name, id);
            Ok(id)
        }
        Err(e) if is_primary_key_violation(&e) => {
            // Only reachable when the caller supplied the id.
            Err(StoreError::DuplicateId(item.id.unwrap_or_default()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Overwrite every mutable field of the row matching `item.id`.
///
/// Returns `false` when no row has that id. `sort_order` is left alone.
pub fn update_one(conn: &Connection, item: &BangumiItem) -> Result<bool, StoreError> {
    let id = item
        .id
        .ok_or_else(|| StoreError::Validation("update requires an id".to_string()))?;
    let labels = labels_to_text(&item.labels)?;

    let changed = conn.execute(
        "UPDATE bangumi
         SET name = ?2, nameCN = ?3, summary = ?4, cover = ?5, url = ?6, labels = ?7
         WHERE id = ?1",
        params![
            id,
            item.name,
            item.name_cn,
            item.summary,
            item.cover,
            item.url,
            labels,
        ],
    )?;
    log::info!("Updated bangumi id {} ({} row(s) changed)", id, changed);
    Ok(changed > 0)
}

/// Assign `sort_order = index` for each id, in one transaction.
///
/// Unknown ids are skipped with a warning. Any statement failure rolls back
/// every assignment made so far.
pub fn update_order(conn: &Connection, sorted_ids: &[i64]) -> Result<OrderOutcome, StoreError> {
    let tx = conn.unchecked_transaction()?;
    let mut outcome = OrderOutcome::default();
    {
        let mut stmt = tx.prepare("UPDATE bangumi SET sort_order = ?1 WHERE id = ?2")?;
        for (index, &id) in sorted_ids.iter().enumerate() {
            match stmt.execute(params![index as i64, id]) {
                Ok(0) => {
                    log::warn!("Reorder: no bangumi with id {}, skipping", id);
                    outcome.skipped.push(id);
                }
                Ok(_) => outcome.updated += 1,
                Err(source) => {
                    log::error!("Reorder failed at id {}: {}", id, source);
                    return Err(StoreError::OrderUpdate { id, source });
                }
            }
        }
    }
    tx.commit()?;
    log::info!(
        "Reordered {} bangumi ({} unknown id(s) skipped)",
        outcome.updated,
        outcome.skipped.len()
    );
    Ok(outcome)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Serialize labels for the `labels` column. An empty list is `[]`, never NULL.
pub fn labels_to_text(labels: &[Label]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(labels)?)
}

/// Parse the `labels` column. NULL and empty text read as an empty list.
pub fn labels_from_text(text: Option<&str>) -> Result<Vec<Label>, serde_json::Error> {
    match text {
        None => Ok(Vec::new()),
        Some(s) if s.trim().is_empty() => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s),
    }
}

fn is_primary_key_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
