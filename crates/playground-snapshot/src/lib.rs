//! Interpreter snapshot model.
//!
//! Decodes the documents produced by the remote script interpreter into
//! [`InterpreterSnapshot`] values and derives the views shown to the user:
//! the remaining script, the headline and display-ready element lists.
//!
//! # Example
//!
//! ```
//! use playground_snapshot::{ExecutionStage, InterpreterSnapshot, Outcome};
//!
//! let doc = r#"{
//!     "result": {"type": "NoResult"},
//!     "state": {
//!         "scriptPubKey": [{"type": "OP_CHECKSIG"}],
//!         "scriptSig": [{"type": "ScriptConstant", "value": "0x3045"}],
//!         "currentScript": [{"type": "ScriptConstant", "value": "0x3045"}],
//!         "stack": [],
//!         "altStack": [],
//!         "stage": {"type": "ExecutingScriptSig"}
//!     },
//!     "step": 0
//! }"#;
//!
//! let snapshot = InterpreterSnapshot::from_json(doc).unwrap();
//! assert_eq!(snapshot.stage, ExecutionStage::ExecutingSigScript);
//! assert_eq!(snapshot.outcome, Outcome::Pending);
//! assert_eq!(snapshot.remaining_script().len(), 2);
//! ```

pub mod display;
pub mod element;
pub mod error;
pub mod snapshot;
pub mod stage;
pub mod target;


pub use display::{presentable, DisplayElement};
pub use element::{ElementValue, ScriptElement};
pub use error::SnapshotError;
pub use snapshot::InterpreterSnapshot;
pub use stage::{ExecutionStage, Outcome};
pub use target::TraceTarget;
