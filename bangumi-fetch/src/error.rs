use bangumi_core::{Classified, ErrorKind};

/// Errors that can occur while loading settings or fetching the catalog.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error on page {page} (HTTP {status})")]
    Status { page: u32, status: u16 },

    #[error("Page {page} returned code {code}: {message}")]
    Envelope {
        page: u32,
        code: i64,
        message: String,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Remote catalog unavailable: {0}")]
    RemoteMetadata(String),
}

impl Classified for FetchError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Json(_) => ErrorKind::Serialization,
            Self::Http(_) | Self::Status { .. } | Self::Envelope { .. } | Self::RemoteMetadata(_) => {
                ErrorKind::RemoteMetadata
            }
        }
    }
}
