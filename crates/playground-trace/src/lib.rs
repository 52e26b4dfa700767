#![deny(missing_docs)]

//! # playground-trace
//!
//! Coordinates the interpretation view of one transaction input.
//!
//! [`TraceCoordinator`] runs a trace in one of two modes:
//!
//! - **Stepped**: one request per step, navigable in both directions
//!   through [`Navigation`] and [`DeepLink`]s.
//! - **Streamed**: one stream pushes every snapshot until the interpreter
//!   reaches a verdict.
//!
//! State is published as [`TraceState`]. Responses to superseded requests
//! and callbacks from cancelled streams never reach it.
//!
//! # Example
//!
//! ```no_run
//! use playground_client::ClientConfig;
//! use playground_trace::{DeepLink, TraceCoordinator, TraceState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = TraceCoordinator::from_config(ClientConfig::from_env());
//! let mut updates = coordinator.subscribe();
//!
//! let link: DeepLink = "#/transaction/f2f398dace996dab12e0cfb02fb0b59de0ef0398be393d90ebc8ab397550370b/input/0/interpret?step=3".parse()?;
//! coordinator.follow(&link);
//!
//! let state = updates.wait_for(|s| !s.is_loading() && *s != TraceState::Idle).await?;
//! if let TraceState::Ready(ready) = &*state {
//!     println!("{}", ready.headline());
//! }
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod error;
pub mod link;
pub mod navigation;
pub mod state;

pub use coordinator::TraceCoordinator;
pub use error::{LinkError, NavigationError, TraceError};
pub use link::{DeepLink, LinkMode};
pub use navigation::Navigation;
pub use state::{ReadyTrace, StreamStatus, TraceMode, TraceState};
