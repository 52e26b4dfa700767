//! Published coordinator state.

use playground_snapshot::{InterpreterSnapshot, TraceTarget};

use crate::error::TraceError;
use crate::navigation::Navigation;

/// How a trace obtains its snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceMode {
    /// One request per step; addressable in both directions.
    Stepped,
    /// One stream for the whole input; forward only.
    Streamed,
}

impl std::fmt::Display for TraceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stepped => f.write_str("stepped"),
            Self::Streamed => f.write_str("streamed"),
        }
    }
}

/// Connection status of a streamed trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// Snapshots are still arriving.
    Live,
    /// The stream closed after the interpreter reached a verdict.
    Finished,
    /// The stream was cancelled locally before it finished.
    Cancelled,
}

/// A trace showing a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyTrace {
    /// The interpreted input.
    pub target: TraceTarget,
    /// How the snapshots are obtained.
    pub mode: TraceMode,
    /// Operations executed to reach `snapshot`.
    pub step: u64,
    /// The snapshot on display.
    pub snapshot: InterpreterSnapshot,
    /// Stream status; `None` for stepped traces.
    pub stream: Option<StreamStatus>,
}

impl ReadyTrace {
    /// Previous and next steps, for stepped traces only.
    pub fn navigation(&self) -> Option<Navigation> {
        Navigation::for_trace(self)
    }

    /// Returns `true` once the interpreter has reached a verdict.
    pub fn is_terminal(&self) -> bool {
        self.snapshot.is_terminal()
    }

    /// Headline for the snapshot on display.
    pub fn headline(&self) -> String {
        self.snapshot.headline(self.step)
    }
}

/// The coordinator's state, as published to subscribers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TraceState {
    /// No trace is running.
    #[default]
    Idle,
    /// Waiting for the first snapshot of a request or stream.
    Loading {
        /// The interpreted input.
        target: TraceTarget,
        /// How the snapshots are obtained.
        mode: TraceMode,
        /// Requested step, for stepped traces.
        step: Option<u64>,
    },
    /// A snapshot is available.
    Ready(ReadyTrace),
    /// The last request or stream failed.
    Failed {
        /// The interpreted input.
        target: TraceTarget,
        /// How the snapshots were obtained.
        mode: TraceMode,
        /// What went wrong.
        error: TraceError,
    },
}

impl TraceState {
    /// The input this state refers to, if any.
    pub fn target(&self) -> Option<&TraceTarget> {
        match self {
            Self::Idle => None,
            Self::Loading { target, .. } | Self::Failed { target, .. } => Some(target),
            Self::Ready(ready) => Some(&ready.target),
        }
    }

    /// The trace mode, if a trace is running.
    pub fn mode(&self) -> Option<TraceMode> {
        match self {
            Self::Idle => None,
            Self::Loading { mode, .. } | Self::Failed { mode, .. } => Some(*mode),
            Self::Ready(ready) => Some(ready.mode),
        }
    }

    /// The ready trace, if a snapshot is available.
    pub fn ready(&self) -> Option<&ReadyTrace> {
        match self {
            Self::Ready(ready) => Some(ready),
            _ => None,
        }
    }

    /// Returns `true` while a request or the first stream message is pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}
