//! Error types for decoding interpreter snapshots.

/// Errors that can occur while decoding an interpreter document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The document is not valid JSON or does not match the expected shape.
    #[error("malformed interpreter document: {0}")]
    Json(#[from] serde_json::Error),

    /// A literal element (`ScriptConstant`, `ScriptNum`) arrived without a value.
    #[error("literal element '{0}' has no value")]
    MissingLiteralValue(String),
}
