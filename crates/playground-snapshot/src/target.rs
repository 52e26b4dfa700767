//! The transaction input a trace interprets.

use serde::{Deserialize, Serialize};

/// A transaction input whose scripts are interpreted.
///
/// The transaction id and input range are validated by the interpreter
/// service, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceTarget {
    /// Transaction id, 64 hex characters.
    pub transaction_id: String,
    /// Index of the input within the transaction.
    pub input_index: u32,
}

impl TraceTarget {
    /// Create a target for `input_index` of `transaction_id`.
    pub fn new(transaction_id: impl Into<String>, input_index: u32) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            input_index,
        }
    }
}

impl std::fmt::Display for TraceTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.input_index)
    }
}
