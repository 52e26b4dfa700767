//! Drives a coordinator and prints what it publishes.

use std::io::Write;

use anyhow::{Context, Result};
use playground_client::{StepSource, StreamSource};
use playground_trace::{DeepLink, StreamStatus, TraceCoordinator, TraceMode, TraceState};
use tracing::info;

use crate::render::Renderer;

/// Open `link` and print every snapshot until the view settles.
///
/// Stepped views print one snapshot and its navigation links, or walk to the
/// verdict when `to_end` is set. Streamed views print snapshots until the
/// stream closes; snapshots coalesced by the state channel are reported as
/// skipped.
pub async fn trace<S, T, W>(
    coordinator: &TraceCoordinator<S, T>,
    link: &DeepLink,
    to_end: bool,
    renderer: &Renderer,
    out: &mut W,
) -> Result<()>
where
    S: StepSource,
    T: StreamSource,
    W: Write,
{
    let mut updates = coordinator.subscribe();
    info!(%link, "opening interpretation view");
    coordinator.follow(link);

    let mut printed: Option<u64> = None;
    loop {
        let state = updates.borrow_and_update().clone();
        match state {
            TraceState::Idle | TraceState::Loading { .. } => {}
            TraceState::Failed { target, error, .. } => {
                return Err(error).with_context(|| format!("tracing {target} failed"));
            }
            TraceState::Ready(ready) => {
                if printed != Some(ready.step) {
                    let expected = printed.map_or(0, |p| p + 1);
                    if ready.mode == TraceMode::Streamed && ready.step > expected {
                        writeln!(out, "... {} snapshot(s) skipped", ready.step - expected)?;
                    }
                    write!(out, "{}", renderer.snapshot(&ready))?;
                    printed = Some(ready.step);
                }

                match ready.mode {
                    TraceMode::Stepped => {
                        let navigation = ready.navigation();
                        let next = navigation.as_ref().and_then(|n| n.next_step());
                        match next {
                            Some(next) if to_end => coordinator.request_step(next)?,
                            _ => {
                                if let Some(navigation) = &navigation {
                                    write!(out, "{}", renderer.navigation(navigation))?;
                                }
                                return Ok(());
                            }
                        }
                    }
                    TraceMode::Streamed => {
                        if ready.stream != Some(StreamStatus::Live) {
                            return Ok(());
                        }
                    }
                }
            }
        }

        updates
            .changed()
            .await
            .context("trace coordinator stopped")?;
    }
}
