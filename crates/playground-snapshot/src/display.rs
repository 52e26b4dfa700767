//! Display normalization of element lists.

use playground_taxonomy::{classify, Category, SCRIPT_CONSTANT, SCRIPT_NUM};

use crate::element::{ElementValue, ScriptElement};

/// Push-data marker emitted alongside the pushed constant; never shown.
const PUSHDATA_MARKER: &str = "OP_PUSHDATA";

/// An element as it should be presented.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayElement {
    /// Text to show: the literal value or the opcode mnemonic.
    pub label: String,
    /// Kind after normalization.
    pub kind: String,
    /// Display category, `None` when unclassified.
    pub category: Option<Category>,
}

/// Prepare a list of elements for presentation.
///
/// `OP_PUSHDATA` markers are dropped and an empty constant (`0x`) is shown
/// as the number `0`.
pub fn presentable(elements: &[ScriptElement]) -> Vec<DisplayElement> {
    elements
        .iter()
        .filter(|e| e.kind() != PUSHDATA_MARKER)
        .map(|e| {
            if is_empty_constant(e) {
                DisplayElement {
                    label: "0".to_string(),
                    kind: SCRIPT_NUM.to_string(),
                    category: classify(SCRIPT_NUM),
                }
            } else {
                DisplayElement {
                    label: e.label(),
                    kind: e.kind().to_string(),
                    category: e.category(),
                }
            }
        })
        .collect()
}

fn is_empty_constant(element: &ScriptElement) -> bool {
    element.kind() == SCRIPT_CONSTANT
        && matches!(element.value(), Some(ElementValue::Text(hex)) if hex == "0x")
}
