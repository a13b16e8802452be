//! The long-lived store handle.

use std::path::PathBuf;

use bangumi_core::BangumiItem;
use rusqlite::Connection;

use crate::operations::{self, BatchOutcome, OrderOutcome, StoreError};
use crate::{queries, schema};

/// Lifecycle of a [`Store`]. `Closed` can go back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Unopened,
    Open,
    Closed,
}

#[derive(Debug)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Owns the single SQLite connection.
///
/// Every operation opens the connection on demand, so callers never have
/// to call [`Store::open`] themselves. All calls block until the statement
/// (or transaction) completes.
pub struct Store {
    location: Location,
    conn: Option<Connection>,
    state: StoreState,
}

impl Store {
    /// A store backed by the file at `path`. Nothing is touched until the
    /// first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: None,
            state: StoreState::Unopened,
        }
    }

    /// A store backed by a private in-memory database. Closing it discards
    /// the contents.
    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: None,
            state: StoreState::Unopened,
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Return the open connection, opening it (and ensuring the schema) if
    /// needed. On failure the handle stays unset so a later call can retry.
    pub fn open(&mut self) -> Result<&Connection, StoreError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = match &self.location {
                    Location::File(path) => {
                        log::info!("Opening bangumi database at {}", path.display());
                        schema::open_database(path)?
                    }
                    Location::Memory => schema::open_memory()?,
                };
                log::info!("Bangumi database ready");
                conn
            }
        };
        self.state = StoreState::Open;
        Ok(self.conn.insert(conn))
    }

    /// Release the connection. Calling this on a store that isn't open does
    /// nothing; a failing close is logged, not returned.
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        match conn.close() {
            Ok(()) => log::info!("Bangumi database closed"),
            Err((_, e)) => log::error!("Error while closing bangumi database: {}", e),
        }
        self.state = StoreState::Closed;
    }

    pub fn get_all(&mut self) -> Result<Vec<BangumiItem>, StoreError> {
        queries::get_all(self.open()?)
    }

    pub fn find_by_id(&mut self, id: i64) -> Result<Option<BangumiItem>, StoreError> {
        queries::find_by_id(self.open()?, id)
    }

    pub fn count(&mut self) -> Result<i64, StoreError> {
        queries::count(self.open()?)
    }

    pub fn delete_all(&mut self) -> Result<usize, StoreError> {
        operations::delete_all(self.open()?)
    }

    pub fn insert_batch(&mut self, items: &[BangumiItem]) -> Result<BatchOutcome, StoreError> {
        operations::insert_batch(self.open()?, items)
    }

    pub fn insert_one(&mut self, item: &BangumiItem) -> Result<i64, StoreError> {
        operations::insert_one(self.open()?, item)
    }

    pub fn update_one(&mut self, item: &BangumiItem) -> Result<bool, StoreError> {
        operations::update_one(self.open()?, item)
    }

    pub fn update_order(&mut self, sorted_ids: &[i64]) -> Result<OrderOutcome, StoreError> {
        operations::update_order(self.open()?, sorted_ids)
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}
