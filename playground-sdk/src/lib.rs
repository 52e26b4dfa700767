#![deny(missing_docs)]

//! Script playground SDK.
//!
//! Re-exports all playground components for convenient single-crate usage.

pub use playground_client as client;
pub use playground_snapshot as snapshot;
pub use playground_taxonomy as taxonomy;
pub use playground_trace as trace;
