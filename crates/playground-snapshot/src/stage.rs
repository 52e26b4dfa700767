//! Execution stage and outcome of an interpreter snapshot.

use serde::{Deserialize, Serialize};

/// Which script segment the interpreter is consuming.
///
/// Stage changes are decided by the interpreter; this type only carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExecutionStage {
    /// The unlocking script (scriptSig).
    #[serde(rename = "ExecutingScriptSig")]
    ExecutingSigScript,
    /// The locking script (scriptPubKey).
    #[serde(rename = "ExecutingScriptPubKey")]
    ExecutingPubKeyScript,
    /// The redeem script of a pay-to-script-hash spend.
    #[serde(rename = "ExecutingScriptP2SH")]
    ExecutingP2SH,
    /// The witness script of a segwit spend.
    #[serde(rename = "ExecutingScriptWitness")]
    ExecutingWitnessScript,
}

impl ExecutionStage {
    /// Human-readable name of the script being executed.
    pub fn script_name(&self) -> &'static str {
        match self {
            Self::ExecutingSigScript => "Script Sig",
            Self::ExecutingPubKeyScript => "Script PubKey",
            Self::ExecutingP2SH => "Script P2SH",
            Self::ExecutingWitnessScript => "Script Witness",
        }
    }
}

/// Verdict of the interpreter at a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Outcome {
    /// No verdict yet.
    #[serde(rename = "NoResult")]
    Pending,
    /// Validation finished: `true` when the scripts verified.
    Result(bool),
}

impl Outcome {
    /// Returns `true` once a verdict exists.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Result(_))
    }

    /// The verdict, if any.
    pub fn verdict(&self) -> Option<bool> {
        match self {
            Self::Pending => None,
            Self::Result(v) => Some(*v),
        }
    }
}
