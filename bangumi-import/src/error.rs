use std::path::PathBuf;

use bangumi_core::{Classified, ErrorKind};
use bangumi_db::StoreError;
use bangumi_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Batch insert rolled back: {error_count} of {total} row(s) failed")]
    BatchRejected { error_count: usize, total: usize },
    #[error("Cannot read legacy snapshot {path}: {source}")]
    LegacyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Legacy snapshot {path} is not a JSON list of bangumi: {source}")]
    LegacyFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Store worker failed: {0}")]
    Worker(String),
}

impl Classified for ImportError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch(e) => e.kind(),
            Self::Store(e) => e.kind(),
            Self::BatchRejected { .. } | Self::Worker(_) => ErrorKind::Query,
            Self::LegacyRead { .. } | Self::Write { .. } => ErrorKind::Io,
            Self::LegacyFormat { .. } | Self::Json(_) => ErrorKind::Serialization,
        }
    }
}
