use bangumi_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation answered with `success: false`
    #[error("{}", format_failure(.kind, .message))]
    Failed {
        kind: Option<ErrorKind>,
        message: String,
    },
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}

fn format_failure(kind: &Option<ErrorKind>, message: &str) -> String {
    match kind {
        Some(kind) => format!("{}: {}", kind, message),
        None => message.to_string(),
    }
}
