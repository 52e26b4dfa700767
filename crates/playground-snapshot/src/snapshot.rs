//! Interpreter snapshots and their wire document.

use serde::{Deserialize, Serialize};

use crate::element::ScriptElement;
use crate::error::SnapshotError;
use crate::stage::{ExecutionStage, Outcome};

/// One point in the execution of an input's scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotDocument", into = "SnapshotDocument")]
pub struct InterpreterSnapshot {
    /// Segment currently being executed.
    pub stage: ExecutionStage,
    /// The output's locking script (scriptPubKey).
    pub locking_script: Vec<ScriptElement>,
    /// The input's unlocking script (scriptSig).
    pub unlocking_script: Vec<ScriptElement>,
    /// Operations still to run in the current segment.
    pub current_script: Vec<ScriptElement>,
    /// Redeem script, for P2SH spends.
    pub p2sh_script: Option<Vec<ScriptElement>>,
    /// Witness script, for segwit spends.
    pub witness_script: Option<Vec<ScriptElement>>,
    /// Witness stack items, for segwit spends.
    pub witness_stack_items: Option<Vec<ScriptElement>>,
    /// Main stack, bottom first.
    pub main_stack: Vec<ScriptElement>,
    /// Alt stack, bottom first.
    pub alt_stack: Vec<ScriptElement>,
    /// Verdict at this point.
    pub outcome: Outcome,
    /// Operations executed to reach this snapshot, when the interpreter numbers them.
    pub step_index: Option<u64>,
}

/// Wire shape: `{"result": ..., "state": {...}, "step": n}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotDocument {
    result: Outcome,
    state: StateDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    step: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateDocument {
    script_pub_key: Vec<ScriptElement>,
    script_sig: Vec<ScriptElement>,
    current_script: Vec<ScriptElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script_p2sh: Option<Vec<ScriptElement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script_witness: Option<Vec<ScriptElement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    script_witness_stack: Option<Vec<ScriptElement>>,
    stack: Vec<ScriptElement>,
    alt_stack: Vec<ScriptElement>,
    stage: ExecutionStage,
}

impl From<SnapshotDocument> for InterpreterSnapshot {
    fn from(doc: SnapshotDocument) -> Self {
        let state = doc.state;
        Self {
            stage: state.stage,
            locking_script: state.script_pub_key,
            unlocking_script: state.script_sig,
            current_script: state.current_script,
            p2sh_script: state.script_p2sh,
            witness_script: state.script_witness,
            witness_stack_items: state.script_witness_stack,
            main_stack: state.stack,
            alt_stack: state.alt_stack,
            outcome: doc.result,
            step_index: doc.step,
        }
    }
}

impl From<InterpreterSnapshot> for SnapshotDocument {
    fn from(s: InterpreterSnapshot) -> Self {
        Self {
            result: s.outcome,
            state: StateDocument {
                script_pub_key: s.locking_script,
                script_sig: s.unlocking_script,
                current_script: s.current_script,
                script_p2sh: s.p2sh_script,
                script_witness: s.witness_script,
                script_witness_stack: s.witness_stack_items,
                stack: s.main_stack,
                alt_stack: s.alt_stack,
                stage: s.stage,
            },
            step: s.step_index,
        }
    }
}

impl InterpreterSnapshot {
    /// Decode a snapshot from an interpreter JSON document.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode the snapshot as an interpreter JSON document.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns `true` once the interpreter has reached a verdict.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// The script still to be executed, as shown to the user.
    ///
    /// While the unlocking script runs without a verdict, the whole locking
    /// script follows it, so it is appended. In every other case the current
    /// script alone is returned. Computed on every call since `stage` differs
    /// between snapshots.
    pub fn remaining_script(&self) -> Vec<ScriptElement> {
        match (self.outcome, self.stage) {
            (Outcome::Pending, ExecutionStage::ExecutingSigScript) => self
                .current_script
                .iter()
                .chain(self.locking_script.iter())
                .cloned()
                .collect(),
            _ => self.current_script.clone(),
        }
    }

    /// One-line description of the snapshot.
    ///
    /// `Executing Script Sig [3]` while pending (the bracket holds `step`),
    /// `Execution Succeeded` or `Execution Failed` once a verdict exists.
    pub fn headline(&self, step: u64) -> String {
        match self.outcome {
            Outcome::Pending => format!("Executing {} [{}]", self.stage.script_name(), step),
            Outcome::Result(true) => "Execution Succeeded".to_string(),
            Outcome::Result(false) => "Execution Failed".to_string(),
        }
    }
}
