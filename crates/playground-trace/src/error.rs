//! Error types for trace coordination.

use playground_client::ClientError;
use playground_snapshot::TraceTarget;

/// Why a trace ended up in [`TraceState::Failed`](crate::TraceState::Failed).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    /// The interpreter rejected the transaction id or input index.
    #[error("interpreter rejected {target}: {message}")]
    InvalidTarget {
        /// The rejected target.
        target: TraceTarget,
        /// Message from the interpreter.
        message: String,
    },

    /// A step request failed or returned a non-success status.
    #[error("fetching step {step} failed: {message}")]
    FetchFailed {
        /// The requested step.
        step: u64,
        /// Description of the failure.
        message: String,
    },

    /// The stream failed or closed before the interpreter reached a verdict.
    #[error("interpretation stream failed after {received} snapshot(s): {reason}")]
    StreamFailed {
        /// Why the stream ended.
        reason: String,
        /// Snapshots received before it ended.
        received: u64,
    },
}

impl TraceError {
    pub(crate) fn from_fetch(target: &TraceTarget, step: u64, error: &ClientError) -> Self {
        if error.is_invalid_target() {
            let message = match error {
                ClientError::ServerError { message, .. } if !message.is_empty() => message.clone(),
                other => other.to_string(),
            };
            Self::InvalidTarget {
                target: target.clone(),
                message,
            }
        } else {
            Self::FetchFailed {
                step,
                message: error.to_string(),
            }
        }
    }
}

/// Misuse of the coordinator's navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// No trace has been started since the last target change.
    #[error("no trace has been started")]
    NotStarted,

    /// The current trace is streamed and cannot be stepped.
    #[error("the current trace is streamed and cannot be stepped")]
    NotStepped,
}

/// Errors raised while parsing a deep link.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The path is not `/transaction/{id}/input/{index}/interpret`.
    #[error("not an interpretation link: {0}")]
    NotInterpretLink(String),

    /// The input index is not a non-negative integer.
    #[error("invalid input index: {0}")]
    InvalidInputIndex(String),

    /// The step is not a non-negative integer.
    #[error("invalid step: {0}")]
    InvalidStep(String),
}
