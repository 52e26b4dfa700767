//! WebSocket client for the streaming interpretation endpoint.

use std::sync::{Mutex, PoisonError};

use futures_util::StreamExt;
use playground_snapshot::{InterpreterSnapshot, TraceTarget};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::handle::{CloseReason, OnClose, OnSnapshot, StreamHandle, StreamSink};

/// WebSocket client that lets the interpreter run a whole input and pushes
/// one snapshot per executed operation.
///
/// A client keeps at most one stream open: opening another first cancels
/// the previous one, so its `on_close` runs before the new connection is
/// made.
#[derive(Debug)]
pub struct StreamClient {
    /// Client configuration.
    config: ClientConfig,
    /// The stream opened last, if any.
    active: Mutex<Option<StreamHandle>>,
}

impl StreamClient {
    /// Create a new stream client with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            active: Mutex::new(None),
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open a stream interpreting `target`.
    ///
    /// Must be called from within a tokio runtime. Connection failures are
    /// reported through `on_close` with [`CloseReason::Failed`].
    pub fn open_stream(
        &self,
        target: &TraceTarget,
        on_snapshot: OnSnapshot,
        on_close: OnClose,
    ) -> StreamHandle {
        self.cancel();

        let url = self.config.stream_url(target);
        info!(%target, "opening interpretation stream");
        let handle = StreamHandle::spawn(on_snapshot, on_close, move |sink| run_stream(url, sink));

        let displaced = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.clone());
        if let Some(displaced) = displaced {
            displaced.cancel();
        }

        handle
    }

    /// Cancel the open stream, if any. Idempotent.
    pub fn cancel(&self) {
        let previous = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            previous.cancel();
        }
    }
}

/// Read the interpreter's messages until the connection ends.
async fn run_stream(url: Result<String, ClientError>, sink: StreamSink) {
    let url = match url {
        Ok(url) => url,
        Err(e) => {
            sink.close(CloseReason::Failed(e.to_string()));
            return;
        }
    };

    let (mut socket, _) = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok(connected) => connected,
        Err(e) => {
            warn!(%url, error = %e, "interpretation stream connection failed");
            sink.close(CloseReason::Failed(e.to_string()));
            return;
        }
    };

    let mut received = 0u64;
    while let Some(message) = socket.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let snapshot = match InterpreterSnapshot::from_json(&text) {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        warn!(%url, error = %e, "undecodable stream message");
                        sink.close(CloseReason::Failed(e.to_string()));
                        return;
                    }
                };
                received += 1;
                if !sink.deliver(snapshot) {
                    return;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => break,
            Err(e) => {
                warn!(%url, error = %e, received, "interpretation stream failed");
                sink.close(CloseReason::Failed(e.to_string()));
                return;
            }
        }
    }

    debug!(%url, received, "interpretation stream closed by server");
    sink.close(CloseReason::Completed);
}
