//! Move catalog data in and out of the bangumi store.
//!
//! This crate owns the replace-all sync (fetch, then delete and re-insert),
//! the one-time migration from the legacy JSON snapshot, the JSON export,
//! and [`Library`], the request/response surface handed to the UI layer.

pub mod error;
pub mod export;
pub mod legacy;
pub mod library;
pub mod sync;

pub use error::ImportError;
pub use export::export_json;
pub use legacy::{MigrationOutcome, load_or_migrate, migrate_legacy_snapshot, read_snapshot};
pub use library::Library;
pub use sync::{SyncReport, replace_all, sync_from_remote};
