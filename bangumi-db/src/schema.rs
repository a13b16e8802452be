//! SQLite schema creation and migration.

use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Create the `bangumi` table if it doesn't exist, then apply migrations.
///
/// This is idempotent — safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    migrate(conn)?;
    Ok(())
}

/// Open or create the database file at the given path.
///
/// Missing parent directories are created.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Whether `table` has a column named `column`.
pub fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, SchemaError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>("name"))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Additive migrations. Databases created before ordering existed gain the
/// `sort_order` column; existing rows keep it NULL.
fn migrate(conn: &Connection) -> Result<(), SchemaError> {
    if has_column(conn, "bangumi", "sort_order")? {
        log::debug!("sort_order column already present");
    } else {
        log::info!("Adding missing sort_order column to bangumi table");
        conn.execute_batch("ALTER TABLE bangumi ADD COLUMN sort_order INTEGER;")?;
    }
    Ok(())
}

// sort_order is added by `migrate`, for fresh and legacy files alike.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS bangumi (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    nameCN TEXT,
    summary TEXT,
    cover TEXT,
    url TEXT,
    labels TEXT
);
"#;
