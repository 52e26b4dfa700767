//! Error types for interpreter client operations.

/// Errors that can occur when talking to the interpreter service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Interpreter document violated the snapshot model.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(#[from] playground_snapshot::SnapshotError),

    /// Server returned a non-2xx response.
    #[error("server error ({status_code}): {message}")]
    ServerError {
        /// HTTP status code.
        status_code: u16,
        /// Error message from server.
        message: String,
    },

    /// Transaction or input not found (404).
    #[error("not found")]
    NotFound,

    /// The configured server URL cannot be used.
    #[error("invalid server url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Returns `true` when the interpreter rejected the transaction id or
    /// input index rather than failing to answer.
    pub fn is_invalid_target(&self) -> bool {
        match self {
            Self::NotFound => true,
            Self::ServerError { status_code, .. } => *status_code == 400,
            _ => false,
        }
    }
}
