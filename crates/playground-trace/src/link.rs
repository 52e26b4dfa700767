//! Deep links into an interpretation view.
//!
//! A link addresses either one step of a stepped trace or a streamed run:
//!
//! ```text
//! /transaction/{transactionId}/input/{inputIndex}/interpret?step=N
//! /transaction/{transactionId}/input/{inputIndex}/interpret?automatic=true
//! ```
//!
//! Parsing also accepts the hash-routed forms (`#/transaction/...`,
//! `/#/transaction/...`) and full URLs carrying either form.

use std::str::FromStr;

use playground_snapshot::TraceTarget;

use crate::error::LinkError;
use crate::state::TraceMode;

/// What a link asks the coordinator to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// The snapshot after this many operations.
    Step(u64),
    /// A streamed run of the whole input.
    Automatic,
}

/// An addressable interpretation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    /// The interpreted input.
    pub target: TraceTarget,
    /// Step or streamed run.
    pub mode: LinkMode,
}

impl DeepLink {
    /// Link to `step` of a stepped trace of `target`.
    pub fn step(target: TraceTarget, step: u64) -> Self {
        Self {
            target,
            mode: LinkMode::Step(step),
        }
    }

    /// Link to a streamed run of `target`.
    pub fn automatic(target: TraceTarget) -> Self {
        Self {
            target,
            mode: LinkMode::Automatic,
        }
    }

    /// The trace mode this link selects.
    pub fn trace_mode(&self) -> TraceMode {
        match self.mode {
            LinkMode::Step(_) => TraceMode::Stepped,
            LinkMode::Automatic => TraceMode::Streamed,
        }
    }

    /// The requested step, for stepped links.
    pub fn requested_step(&self) -> Option<u64> {
        match self.mode {
            LinkMode::Step(step) => Some(step),
            LinkMode::Automatic => None,
        }
    }
}

impl std::fmt::Display for DeepLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "/transaction/{}/input/{}/interpret",
            self.target.transaction_id, self.target.input_index
        )?;
        match self.mode {
            LinkMode::Step(step) => write!(f, "?step={step}"),
            LinkMode::Automatic => f.write_str("?automatic=true"),
        }
    }
}

/// Strip everything in front of the routed path and any trailing fragment.
fn routed_path(input: &str) -> &str {
    let input = input.trim();
    let route = if let Some(at) = input.find("#/") {
        &input[at + 1..]
    } else if let Some(rest) = input.strip_prefix('#') {
        rest
    } else {
        match input.split_once("://") {
            Some((_, rest)) => rest.find('/').map_or("", |at| &rest[at..]),
            None => input,
        }
    };
    route.split_once('#').map_or(route, |(route, _)| route)
}

/// Only an explicit `true` or `1` turns a flag on.
fn parse_flag(value: &str) -> bool {
    matches!(value, "true" | "1")
}

impl FromStr for DeepLink {
    type Err = LinkError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let route = routed_path(input);
        let (path, query) = route.split_once('?').unwrap_or((route, ""));

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (transaction_id, input_index) = match segments.as_slice() {
            ["transaction", txid, "input", index, "interpret"] => (*txid, *index),
            _ => return Err(LinkError::NotInterpretLink(input.to_string())),
        };
        let input_index: u32 = input_index
            .parse()
            .map_err(|_| LinkError::InvalidInputIndex(input_index.to_string()))?;
        let target = TraceTarget::new(transaction_id, input_index);

        let mut automatic = false;
        let mut step = None;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "automatic" => automatic = parse_flag(value),
                "step" => step = Some(value),
                _ => {}
            }
        }

        if automatic {
            return Ok(Self::automatic(target));
        }

        let step = match step {
            Some(raw) => raw
                .parse()
                .map_err(|_| LinkError::InvalidStep(raw.to_string()))?,
            None => 0,
        };
        Ok(Self::step(target, step))
    }
}
