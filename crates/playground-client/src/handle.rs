//! Owned handle over one streaming delivery.
//!
//! A [`StreamHandle`] pairs a spawned producer task with the caller's
//! callbacks. The producer pushes snapshots through a [`StreamSink`]; the
//! handle guarantees `on_close` runs exactly once and that no snapshot is
//! delivered after [`StreamHandle::cancel`] returns.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use playground_snapshot::InterpreterSnapshot;
use tokio::task::AbortHandle;

/// Callback invoked once per pushed snapshot.
///
/// Runs on the delivery task; it must not cancel its own handle.
pub type OnSnapshot = Box<dyn Fn(InterpreterSnapshot) + Send + Sync>;

/// Callback invoked exactly once when the stream terminates.
pub type OnClose = Box<dyn FnOnce(CloseReason) + Send>;

/// Why a stream terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The server closed the connection after its last message.
    Completed,
    /// The stream was cancelled locally.
    Cancelled,
    /// The connection failed or delivered an unreadable message.
    Failed(String),
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

struct Delivery {
    closed: bool,
    on_snapshot: Option<OnSnapshot>,
    on_close: Option<OnClose>,
}

struct Shared {
    delivery: Mutex<Delivery>,
    task: Mutex<Option<AbortHandle>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    /// Mark the stream closed and run `on_close`. Returns `false` if it was
    /// already closed.
    fn close(&self, reason: CloseReason) -> bool {
        let on_close = {
            let mut delivery = lock(&self.delivery);
            if delivery.closed {
                return false;
            }
            delivery.closed = true;
            delivery.on_snapshot = None;
            delivery.on_close.take()
        };

        if let Some(callback) = on_close {
            callback(reason);
        }
        true
    }

    fn abort_task(&self) {
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }
}

/// Producer side of a stream, handed to the delivery task.
#[derive(Clone)]
pub struct StreamSink {
    shared: Arc<Shared>,
}

impl StreamSink {
    /// Deliver one snapshot. Returns `false` once the stream is closed, in
    /// which case the producer should stop.
    pub fn deliver(&self, snapshot: InterpreterSnapshot) -> bool {
        let delivery = lock(&self.shared.delivery);
        if delivery.closed {
            return false;
        }
        if let Some(callback) = &delivery.on_snapshot {
            callback(snapshot);
        }
        true
    }

    /// Terminate the stream with `reason`. Later calls are no-ops.
    pub fn close(&self, reason: CloseReason) {
        self.shared.close(reason);
    }

    /// Returns `true` once the stream has terminated.
    pub fn is_closed(&self) -> bool {
        lock(&self.shared.delivery).closed
    }
}

/// Owned handle over one open stream.
///
/// Clones refer to the same stream. Dropping a handle does not close the
/// stream; call [`cancel`](Self::cancel).
#[derive(Clone)]
pub struct StreamHandle {
    shared: Arc<Shared>,
}

impl StreamHandle {
    /// Spawn `run` on the current tokio runtime as the producer of a new stream.
    ///
    /// If `run` returns without closing the sink, the stream is closed as
    /// [`CloseReason::Completed`].
    pub fn spawn<F, Fut>(on_snapshot: OnSnapshot, on_close: OnClose, run: F) -> Self
    where
        F: FnOnce(StreamSink) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            delivery: Mutex::new(Delivery {
                closed: false,
                on_snapshot: Some(on_snapshot),
                on_close: Some(on_close),
            }),
            task: Mutex::new(None),
        });

        let sink = StreamSink {
            shared: Arc::clone(&shared),
        };
        let producer = run(sink.clone());
        let task = tokio::spawn(async move {
            producer.await;
            sink.close(CloseReason::Completed);
        });
        *lock(&shared.task) = Some(task.abort_handle());

        Self { shared }
    }

    /// Close the stream locally.
    ///
    /// Runs `on_close` with [`CloseReason::Cancelled`] unless the stream had
    /// already terminated. After this returns no snapshot is delivered.
    /// Must not be called from inside this stream's own callbacks.
    pub fn cancel(&self) {
        self.shared.close(CloseReason::Cancelled);
        self.shared.abort_task();
    }

    /// Returns `true` once the stream has terminated.
    pub fn is_closed(&self) -> bool {
        lock(&self.shared.delivery).closed
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_snapshot::{ExecutionStage, Outcome};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn snapshot() -> InterpreterSnapshot {
        InterpreterSnapshot {
            stage: ExecutionStage::ExecutingSigScript,
            locking_script: vec![],
            unlocking_script: vec![],
            current_script: vec![],
            p2sh_script: None,
            witness_script: None,
            witness_stack_items: None,
            main_stack: vec![],
            alt_stack: vec![],
            outcome: Outcome::Pending,
            step_index: None,
        }
    }

    #[tokio::test]
    async fn test_producer_end_closes_as_completed() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let (close_tx, close_rx) = oneshot::channel();

        let counter = Arc::clone(&delivered);
        let handle = StreamHandle::spawn(
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            Box::new(move |reason| {
                let _ = close_tx.send(reason);
            }),
            |sink| async move {
                sink.deliver(snapshot());
                sink.deliver(snapshot());
            },
        );

        assert_eq!(close_rx.await.unwrap(), CloseReason::Completed);
        assert_eq!(delivered.load(Ordering::SeqCst), 2);
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_cancel_runs_on_close_once_and_stops_delivery() {
        let closes = Arc::new(AtomicUsize::new(0));
        let delivered = Arc::new(AtomicUsize::new(0));
        let (sink_tx, sink_rx) = oneshot::channel();

        let close_counter = Arc::clone(&closes);
        let counter = Arc::clone(&delivered);
        let handle = StreamHandle::spawn(
            Box::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            Box::new(move |reason| {
                assert_eq!(reason, CloseReason::Cancelled);
                close_counter.fetch_add(1, Ordering::SeqCst);
            }),
            |sink| async move {
                let _ = sink_tx.send(sink);
                std::future::pending::<()>().await;
            },
        );

        let sink = sink_rx.await.unwrap();
        assert!(sink.deliver(snapshot()));

        handle.cancel();
        handle.cancel();

        assert!(!sink.deliver(snapshot()));
        sink.close(CloseReason::Failed("late".into()));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn test_producer_failure_reason_is_reported() {
        let (close_tx, close_rx) = oneshot::channel();
        let _handle = StreamHandle::spawn(
            Box::new(|_| {}),
            Box::new(move |reason| {
                let _ = close_tx.send(reason);
            }),
            |sink| async move {
                sink.close(CloseReason::Failed("connection refused".into()));
            },
        );

        assert_eq!(
            close_rx.await.unwrap(),
            CloseReason::Failed("connection refused".into())
        );
    }
}
