//! Seams between the trace coordinator and the interpreter transports.

use std::future::Future;

use playground_snapshot::{InterpreterSnapshot, TraceTarget};

use crate::error::ClientError;
use crate::handle::{OnClose, OnSnapshot, StreamHandle};
use crate::step::StepClient;
use crate::stream::StreamClient;

/// Something that can answer "snapshot after N operations" requests.
pub trait StepSource: Send + Sync + 'static {
    /// Fetch the snapshot after exactly `step` operations of `target`.
    fn fetch_step(
        &self,
        target: &TraceTarget,
        step: u64,
    ) -> impl Future<Output = Result<InterpreterSnapshot, ClientError>> + Send;
}

/// Something that can run an input to completion, pushing snapshots.
pub trait StreamSource: Send + Sync + 'static {
    /// Open a stream for `target`, superseding any stream this source has open.
    fn open_stream(
        &self,
        target: &TraceTarget,
        on_snapshot: OnSnapshot,
        on_close: OnClose,
    ) -> StreamHandle;
}

impl StepSource for StepClient {
    async fn fetch_step(
        &self,
        target: &TraceTarget,
        step: u64,
    ) -> Result<InterpreterSnapshot, ClientError> {
        StepClient::fetch_step(self, target, step).await
    }
}

impl StreamSource for StreamClient {
    fn open_stream(
        &self,
        target: &TraceTarget,
        on_snapshot: OnSnapshot,
        on_close: OnClose,
    ) -> StreamHandle {
        StreamClient::open_stream(self, target, on_snapshot, on_close)
    }
}
