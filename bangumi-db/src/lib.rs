//! SQLite persistence layer for the bangumi list.
//!
//! Provides schema creation, the additive `sort_order` migration, CRUD,
//! batch and ordering operations, and the [`Store`] handle that owns the
//! single connection used for the process lifetime.

pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;

pub use operations::{
    BatchOutcome, OrderOutcome, StoreError, delete_all, insert_batch, insert_one, update_one,
    update_order,
};
pub use queries::{count, find_by_id, get_all};
pub use schema::{SchemaError, open_database, open_memory};
pub use store::{Store, StoreState};
