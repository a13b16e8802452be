//! The uniform result shape returned across the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminator shared by every fallible operation in the workspace.
///
/// Serialized with the same names [`ErrorKind::as_str`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Required settings are missing or the settings file is unreadable.
    #[serde(rename = "ConfigError")]
    Config,
    /// The database file or schema could not be opened/created.
    #[serde(rename = "StoreInitError")]
    StoreInit,
    /// A read or write against an open store failed.
    #[serde(rename = "QueryError")]
    Query,
    /// A caller-supplied id collides with an existing row.
    #[serde(rename = "DuplicateIdError")]
    DuplicateId,
    /// The request itself is malformed (e.g. update without an id).
    #[serde(rename = "ValidationError")]
    Validation,
    /// A reorder transaction was rolled back.
    #[serde(rename = "OrderUpdateError")]
    OrderUpdate,
    /// The first page of the remote catalog could not be fetched.
    #[serde(rename = "RemoteMetadataError")]
    RemoteMetadata,
    #[serde(rename = "IoError")]
    Io,
    #[serde(rename = "SerializationError")]
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "ConfigError",
            Self::StoreInit => "StoreInitError",
            Self::Query => "QueryError",
            Self::DuplicateId => "DuplicateIdError",
            Self::Validation => "ValidationError",
            Self::OrderUpdate => "OrderUpdateError",
            Self::RemoteMetadata => "RemoteMetadataError",
            Self::Io => "IoError",
            Self::Serialization => "SerializationError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can be mapped onto an [`ErrorKind`].
pub trait Classified {
    fn kind(&self) -> ErrorKind;
}

/// `{success, data?, error?, cancelled?}` as seen by the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T = ()> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<bool>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            cancelled: None,
        }
    }

    /// Success with no payload.
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            error_kind: None,
            cancelled: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: Some(kind),
            cancelled: None,
        }
    }

    /// An unsuccessful outcome that is not an error, such as updating a row
    /// that does not exist.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: None,
            cancelled: None,
        }
    }

    /// An operation that did not run because the user backed out.
    pub fn cancelled() -> Self {
        Self {
            success: false,
            data: None,
            error: None,
            error_kind: None,
            cancelled: Some(true),
        }
    }

    pub fn from_error<E>(err: &E) -> Self
    where
        E: Classified + fmt::Display,
    {
        Self::failure(err.kind(), err.to_string())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.unwrap_or(false)
    }
}

impl<T, E> From<Result<T, E>> for ApiResponse<T>
where
    E: Classified + fmt::Display,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::from_error(&e),
        }
    }
}
