//! Shared types for the bangumi shelf.
//!
//! Everything that crosses a crate boundary lives here: the catalog entry
//! itself, the export projection, and the `{success, error}` response shape
//! returned by every boundary operation.

pub mod item;
pub mod response;

pub use item::{BangumiItem, ExportItem, Label};
pub use response::{ApiResponse, Classified, ErrorKind};
