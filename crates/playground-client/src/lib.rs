#![deny(missing_docs)]

//! # playground-client
//!
//! Transports for a remote Bitcoin script interpreter.
//!
//! - [`StepClient`] asks for the snapshot after exactly N operations
//!   (`GET .../interpret-with-steps/{step}`).
//! - [`StreamClient`] opens a WebSocket on `.../stream-interpret` and
//!   receives one snapshot per executed operation.
//!
//! # Example
//!
//! ```no_run
//! use playground_client::{ClientConfig, StepClient};
//! use playground_snapshot::TraceTarget;
//!
//! # async fn example() -> Result<(), playground_client::ClientError> {
//! let client = StepClient::new(ClientConfig {
//!     server_url: "https://playground.example.com".to_string(),
//!     ..Default::default()
//! });
//!
//! let target = TraceTarget::new(
//!     "f2f398dace996dab12e0cfb02fb0b59de0ef0398be393d90ebc8ab397550370b",
//!     0,
//! );
//! let snapshot = client.fetch_step(&target, 3).await?;
//! println!("{}", snapshot.headline(3));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod source;
pub mod step;
pub mod stream;


pub use config::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_SERVER_URL, SERVER_URL_ENV};
pub use error::ClientError;
pub use handle::{CloseReason, OnClose, OnSnapshot, StreamHandle, StreamSink};
pub use source::{StepSource, StreamSource};
pub use step::StepClient;
pub use stream::StreamClient;
