//! The trace coordinator state machine.
//!
//! Every transition that supersedes earlier work bumps a generation counter.
//! Fetch results and stream callbacks carry the generation they were issued
//! under and are discarded when it is no longer current.
//!
//! Stream handles are cancelled, and new streams opened, only after the
//! state lock is released: a stream's `on_close` locks the state itself.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use playground_client::{
    ClientConfig, ClientError, CloseReason, OnClose, OnSnapshot, StepClient, StepSource,
    StreamClient, StreamHandle, StreamSource,
};
use playground_snapshot::{InterpreterSnapshot, TraceTarget};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{NavigationError, TraceError};
use crate::link::{DeepLink, LinkMode};
use crate::navigation::Navigation;
use crate::state::{ReadyTrace, StreamStatus, TraceMode, TraceState};

struct Inner {
    generation: u64,
    state: TraceState,
    selected: Option<TraceTarget>,
    /// Last stepped snapshot published for the current trace.
    shown: Option<ReadyTrace>,
    fetch: Option<JoinHandle<()>>,
    stream: Option<StreamHandle>,
}

/// In-flight work taken out of the state, released after the lock is dropped.
#[derive(Default)]
struct Superseded {
    fetch: Option<JoinHandle<()>>,
    stream: Option<StreamHandle>,
}

impl Superseded {
    fn take(inner: &mut Inner) -> Self {
        Self {
            fetch: inner.fetch.take(),
            stream: inner.stream.take(),
        }
    }

    fn release(self) {
        if let Some(fetch) = self.fetch {
            fetch.abort();
        }
        if let Some(stream) = self.stream {
            stream.cancel();
        }
    }
}

struct Shared {
    inner: Mutex<Inner>,
    updates: watch::Sender<TraceState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, inner: &mut Inner, state: TraceState) {
        inner.state = state.clone();
        self.updates.send_replace(state);
    }

    /// Start a new generation in `state`.
    fn advance(&self, inner: &mut Inner, state: TraceState) -> u64 {
        inner.generation += 1;
        self.publish(inner, state);
        inner.generation
    }

    fn apply_fetch(
        &self,
        generation: u64,
        target: TraceTarget,
        step: u64,
        result: Result<InterpreterSnapshot, ClientError>,
    ) {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(%target, step, generation, "discarding stale step response");
            return;
        }
        inner.fetch = None;

        let next = match result {
            Ok(snapshot) => {
                let ready = ReadyTrace {
                    step: snapshot.step_index.unwrap_or(step),
                    target,
                    mode: TraceMode::Stepped,
                    snapshot,
                    stream: None,
                };
                inner.shown = Some(ready.clone());
                TraceState::Ready(ready)
            }
            Err(e) => {
                warn!(%target, step, error = %e, "step request failed");
                TraceState::Failed {
                    error: TraceError::from_fetch(&target, step, &e),
                    target,
                    mode: TraceMode::Stepped,
                }
            }
        };
        self.publish(&mut inner, next);
    }

    fn apply_snapshot(&self, generation: u64, target: &TraceTarget, snapshot: InterpreterSnapshot) {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(%target, generation, "discarding stale stream snapshot");
            return;
        }

        let step = match &inner.state {
            TraceState::Loading { .. } => 0,
            TraceState::Ready(ready) if ready.is_terminal() => {
                debug!(%target, step = ready.step, "ignoring snapshot after verdict");
                return;
            }
            TraceState::Ready(ready) => ready.step + 1,
            TraceState::Idle | TraceState::Failed { .. } => return,
        };

        let next = TraceState::Ready(ReadyTrace {
            target: target.clone(),
            mode: TraceMode::Streamed,
            step,
            snapshot,
            stream: Some(StreamStatus::Live),
        });
        self.publish(&mut inner, next);
    }

    fn apply_close(&self, generation: u64, target: &TraceTarget, reason: CloseReason) {
        let mut inner = self.lock();
        if inner.generation != generation {
            debug!(%target, %reason, generation, "ignoring close of superseded stream");
            return;
        }
        inner.stream = None;

        let next = match (&inner.state, reason) {
            (TraceState::Ready(ready), _) if ready.is_terminal() => {
                info!(%target, steps = ready.step + 1, "interpretation stream finished");
                TraceState::Ready(ReadyTrace {
                    stream: Some(StreamStatus::Finished),
                    ..ready.clone()
                })
            }
            (TraceState::Ready(ready), CloseReason::Cancelled) => {
                info!(%target, "interpretation stream cancelled");
                TraceState::Ready(ReadyTrace {
                    stream: Some(StreamStatus::Cancelled),
                    ..ready.clone()
                })
            }
            (TraceState::Loading { .. }, CloseReason::Cancelled) => TraceState::Idle,
            (TraceState::Ready(ready), reason) => {
                let received = ready.step + 1;
                warn!(%target, %reason, received, "stream ended before a verdict");
                TraceState::Failed {
                    target: target.clone(),
                    mode: TraceMode::Streamed,
                    error: TraceError::StreamFailed {
                        reason: close_description(&reason),
                        received,
                    },
                }
            }
            (TraceState::Loading { .. }, reason) => {
                warn!(%target, %reason, "stream ended before any snapshot");
                TraceState::Failed {
                    target: target.clone(),
                    mode: TraceMode::Streamed,
                    error: TraceError::StreamFailed {
                        reason: close_description(&reason),
                        received: 0,
                    },
                }
            }
            (TraceState::Idle | TraceState::Failed { .. }, _) => return,
        };
        self.publish(&mut inner, next);
    }
}

fn close_description(reason: &CloseReason) -> String {
    match reason {
        CloseReason::Completed => "closed before a verdict".to_string(),
        CloseReason::Cancelled => "cancelled".to_string(),
        CloseReason::Failed(message) => message.clone(),
    }
}

/// Drives one interpretation view.
///
/// The coordinator owns at most one in-flight step request and one open
/// stream. Its state is published through a [`watch`] channel; callers read
/// it with [`state`](Self::state) or follow every transition through
/// [`subscribe`](Self::subscribe).
///
/// `start`, `request_step` and `follow` spawn tasks and must be called from
/// within a tokio runtime.
pub struct TraceCoordinator<S: StepSource, T: StreamSource> {
    steps: Arc<S>,
    streams: Arc<T>,
    shared: Arc<Shared>,
}

impl TraceCoordinator<StepClient, StreamClient> {
    /// Coordinator talking to the interpreter described by `config`.
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(StepClient::new(config.clone()), StreamClient::new(config))
    }
}

impl<S: StepSource, T: StreamSource> TraceCoordinator<S, T> {
    /// Create an idle coordinator over the given sources.
    pub fn new(steps: S, streams: T) -> Self {
        let (updates, _) = watch::channel(TraceState::Idle);
        Self {
            steps: Arc::new(steps),
            streams: Arc::new(streams),
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    generation: 0,
                    state: TraceState::Idle,
                    selected: None,
                    shown: None,
                    fetch: None,
                    stream: None,
                }),
                updates,
            }),
        }
    }

    /// Receiver observing every published state.
    pub fn subscribe(&self) -> watch::Receiver<TraceState> {
        self.shared.updates.subscribe()
    }

    /// The current state.
    pub fn state(&self) -> TraceState {
        self.shared.lock().state.clone()
    }

    /// The target last selected by `change_target`, `start` or `follow`.
    pub fn target(&self) -> Option<TraceTarget> {
        self.shared.lock().selected.clone()
    }

    /// Previous and next steps of the current stepped snapshot.
    pub fn navigation(&self) -> Option<Navigation> {
        self.shared.lock().state.ready().and_then(ReadyTrace::navigation)
    }

    /// Start tracing `target`, superseding any running trace.
    ///
    /// `initial_step` is ignored for streamed traces.
    pub fn start(&self, target: TraceTarget, mode: TraceMode, initial_step: u64) {
        let step = (mode == TraceMode::Stepped).then_some(initial_step);
        let (generation, superseded) = {
            let mut inner = self.shared.lock();
            let superseded = Superseded::take(&mut inner);
            inner.selected = Some(target.clone());
            inner.shown = None;
            let loading = TraceState::Loading {
                target: target.clone(),
                mode,
                step,
            };
            (self.shared.advance(&mut inner, loading), superseded)
        };
        superseded.release();

        info!(%target, %mode, generation, "starting trace");
        match mode {
            TraceMode::Stepped => self.spawn_fetch(generation, target, initial_step),
            TraceMode::Streamed => self.open_stream(generation, target),
        }
    }

    /// Show the snapshot after `step` operations of the current stepped trace.
    ///
    /// Responses to earlier requests still in flight are discarded when they
    /// arrive.
    pub fn request_step(&self, step: u64) -> Result<(), NavigationError> {
        let (generation, target) = {
            let mut inner = self.shared.lock();
            let target = match (inner.state.target(), inner.state.mode()) {
                (Some(target), Some(TraceMode::Stepped)) => target.clone(),
                (Some(_), Some(TraceMode::Streamed)) => return Err(NavigationError::NotStepped),
                _ => return Err(NavigationError::NotStarted),
            };
            let loading = TraceState::Loading {
                target: target.clone(),
                mode: TraceMode::Stepped,
                step: Some(step),
            };
            (self.shared.advance(&mut inner, loading), target)
        };

        debug!(%target, step, generation, "requesting step");
        self.spawn_fetch(generation, target, step);
        Ok(())
    }

    /// Discard the current trace and select `target`. Idempotent.
    ///
    /// On return no callback from superseded work can change the state.
    pub fn change_target(&self, target: TraceTarget) {
        let superseded = {
            let mut inner = self.shared.lock();
            let superseded = Superseded::take(&mut inner);
            if inner.selected.as_ref() != Some(&target) {
                info!(from = ?inner.selected, to = %target, "changing target");
            }
            inner.selected = Some(target);
            inner.shown = None;
            self.shared.advance(&mut inner, TraceState::Idle);
            superseded
        };
        superseded.release();
    }

    /// Stop in-flight work without discarding the snapshot on display.
    /// Idempotent.
    ///
    /// A pending step request returns to the stepped snapshot shown before
    /// it, so navigation stays available; with nothing shown yet the state
    /// returns to [`TraceState::Idle`]. A live stream is marked
    /// [`StreamStatus::Cancelled`].
    pub fn cancel(&self) {
        let superseded = {
            let mut inner = self.shared.lock();
            let superseded = Superseded::take(&mut inner);
            let next = match &inner.state {
                TraceState::Loading {
                    target,
                    mode: TraceMode::Stepped,
                    ..
                } => Some(match &inner.shown {
                    Some(shown) if &shown.target == target => TraceState::Ready(shown.clone()),
                    _ => TraceState::Idle,
                }),
                TraceState::Loading { .. } => Some(TraceState::Idle),
                TraceState::Ready(ready) if ready.stream == Some(StreamStatus::Live) => {
                    let status = if ready.is_terminal() {
                        StreamStatus::Finished
                    } else {
                        StreamStatus::Cancelled
                    };
                    Some(TraceState::Ready(ReadyTrace {
                        stream: Some(status),
                        ..ready.clone()
                    }))
                }
                _ => None,
            };
            inner.generation += 1;
            if let Some(next) = next {
                self.shared.publish(&mut inner, next);
            }
            superseded
        };
        superseded.release();
    }

    /// Navigate to `link`.
    ///
    /// A step of the stepped trace already on display is requested in
    /// place; anything else changes target and starts a new trace.
    pub fn follow(&self, link: &DeepLink) {
        if let LinkMode::Step(step) = link.mode {
            let in_place = {
                let inner = self.shared.lock();
                inner.state.target() == Some(&link.target)
                    && inner.state.mode() == Some(TraceMode::Stepped)
            };
            if in_place && self.request_step(step).is_ok() {
                return;
            }
        }

        self.change_target(link.target.clone());
        self.start(
            link.target.clone(),
            link.trace_mode(),
            link.requested_step().unwrap_or(0),
        );
    }

    fn spawn_fetch(&self, generation: u64, target: TraceTarget, step: u64) {
        let steps = Arc::clone(&self.steps);
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            let result = steps.fetch_step(&target, step).await;
            shared.apply_fetch(generation, target, step, result);
        });

        let mut inner = self.shared.lock();
        if inner.generation == generation {
            inner.fetch = Some(task);
        } else {
            task.abort();
        }
    }

    fn open_stream(&self, generation: u64, target: TraceTarget) {
        let on_snapshot: OnSnapshot = {
            let shared = Arc::clone(&self.shared);
            let target = target.clone();
            Box::new(move |snapshot| shared.apply_snapshot(generation, &target, snapshot))
        };
        let on_close: OnClose = {
            let shared = Arc::clone(&self.shared);
            let target = target.clone();
            Box::new(move |reason| shared.apply_close(generation, &target, reason))
        };

        let handle = self.streams.open_stream(&target, on_snapshot, on_close);

        let stale = {
            let mut inner = self.shared.lock();
            if inner.generation == generation {
                inner.stream = Some(handle);
                None
            } else {
                Some(handle)
            }
        };
        if let Some(handle) = stale {
            handle.cancel();
        }
    }
}

impl<S: StepSource, T: StreamSource> Drop for TraceCoordinator<S, T> {
    fn drop(&mut self) {
        let superseded = {
            let mut inner = self.shared.lock();
            inner.generation += 1;
            Superseded::take(&mut inner)
        };
        superseded.release();
    }
}

impl<S: StepSource, T: StreamSource> std::fmt::Debug for TraceCoordinator<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("TraceCoordinator")
            .field("generation", &inner.generation)
            .field("state", &inner.state)
            .field("selected", &inner.selected)
            .finish()
    }
}
