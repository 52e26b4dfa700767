//! Step navigation for stepped traces.

use playground_snapshot::Outcome;

use crate::link::DeepLink;
use crate::state::{ReadyTrace, TraceMode};

/// Steps reachable from a stepped snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// One operation back; absent at step 0.
    pub previous: Option<DeepLink>,
    /// One operation forward; absent once a verdict exists.
    pub next: Option<DeepLink>,
}

impl Navigation {
    /// Navigation for `trace`, or `None` if it is streamed.
    pub fn for_trace(trace: &ReadyTrace) -> Option<Self> {
        if trace.mode != TraceMode::Stepped {
            return None;
        }

        let step = trace.step;
        let previous = step
            .checked_sub(1)
            .map(|prev| DeepLink::step(trace.target.clone(), prev));
        let next = match trace.snapshot.outcome {
            Outcome::Pending => step
                .checked_add(1)
                .map(|next| DeepLink::step(trace.target.clone(), next)),
            Outcome::Result(_) => None,
        };

        Some(Self { previous, next })
    }

    /// Step number of the previous link.
    pub fn previous_step(&self) -> Option<u64> {
        self.previous.as_ref().and_then(DeepLink::requested_step)
    }

    /// Step number of the next link.
    pub fn next_step(&self) -> Option<u64> {
        self.next.as_ref().and_then(DeepLink::requested_step)
    }
}
