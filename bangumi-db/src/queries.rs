//! Read queries for the bangumi table.

use bangumi_core::BangumiItem;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

use crate::operations::{StoreError, labels_from_text};

const SELECT_COLUMNS: &str =
    "SELECT id, name, nameCN, summary, cover, url, labels, sort_order FROM bangumi";

/// All rows, ordered by `sort_order` (unordered rows last), then by id.
pub fn get_all(conn: &Connection) -> Result<Vec<BangumiItem>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_COLUMNS} ORDER BY sort_order ASC NULLS LAST, id ASC"
    ))?;
    let rows = stmt.query_map([], row_to_item)?;
    let items = rows.collect::<Result<Vec<_>, _>>()?;
    log::debug!("Loaded {} bangumi rows", items.len());
    Ok(items)
}

/// Find a single row by id.
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<BangumiItem>, StoreError> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
    let result = stmt.query_row(params![id], row_to_item);
    match result {
        Ok(item) => Ok(Some(item)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Number of rows in the table.
pub fn count(conn: &Connection) -> Result<i64, StoreError> {
    let n = conn.query_row("SELECT COUNT(*) FROM bangumi", [], |row| row.get(0))?;
    Ok(n)
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<BangumiItem> {
    let labels_text: Option<String> = row.get(6)?;
    let labels = labels_from_text(labels_text.as_deref())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(BangumiItem {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        name_cn: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        summary: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        cover: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        url: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        labels,
        sort_order: row.get(7)?,
    })
}
