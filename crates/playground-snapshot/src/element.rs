//! Script elements as reported by the interpreter.

use playground_taxonomy::{classify, is_literal_marker, Category, SCRIPT_CONSTANT, SCRIPT_NUM};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SnapshotError;

/// The value carried by a literal element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementValue {
    /// A boolean literal.
    Bool(bool),
    /// A numeric literal (`ScriptNum`). Kept as a JSON number so large values survive.
    Number(serde_json::Number),
    /// A textual literal, usually hex for `ScriptConstant`.
    Text(String),
}

impl std::fmt::Display for ElementValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One element of a script or stack.
///
/// Either an opcode (`OP_DUP`, no value) or a literal marker
/// (`ScriptConstant`, `ScriptNum`) carrying a value. Elements are immutable;
/// the accessors expose them for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementDocument", into = "ElementDocument")]
pub struct ScriptElement {
    kind: String,
    value: Option<ElementValue>,
}

/// Wire shape of an element: `{"type": "...", "value": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ElementDocument {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<ElementValue>,
}

impl ScriptElement {
    /// Build an opcode element.
    pub fn opcode(mnemonic: impl Into<String>) -> Self {
        Self {
            kind: mnemonic.into(),
            value: None,
        }
    }

    /// Build a `ScriptConstant` element from its hex text.
    pub fn constant(hex: impl Into<String>) -> Self {
        Self {
            kind: SCRIPT_CONSTANT.to_string(),
            value: Some(ElementValue::Text(hex.into())),
        }
    }

    /// Build a `ScriptNum` element.
    pub fn number(n: i64) -> Self {
        Self {
            kind: SCRIPT_NUM.to_string(),
            value: Some(ElementValue::Number(n.into())),
        }
    }

    /// Build an element from its parts.
    ///
    /// A literal marker without a value is rejected. A value sent alongside
    /// an opcode is dropped, so opcodes never carry one.
    pub fn new(kind: impl Into<String>, value: Option<ElementValue>) -> Result<Self, SnapshotError> {
        let kind = kind.into();
        if is_literal_marker(&kind) {
            return match value {
                Some(value) => Ok(Self {
                    kind,
                    value: Some(value),
                }),
                None => Err(SnapshotError::MissingLiteralValue(kind)),
            };
        }

        if let Some(value) = &value {
            debug!(%kind, %value, "dropping value sent with opcode element");
        }
        Ok(Self { kind, value: None })
    }

    /// The element kind: an opcode mnemonic or a literal marker.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The literal value, present only for literal markers.
    pub fn value(&self) -> Option<&ElementValue> {
        self.value.as_ref()
    }

    /// Returns `true` for `ScriptConstant` and `ScriptNum` elements.
    pub fn is_literal(&self) -> bool {
        is_literal_marker(&self.kind)
    }

    /// Display category of this element, `None` when unclassified.
    pub fn category(&self) -> Option<Category> {
        classify(&self.kind)
    }

    /// Text shown for this element: the value of a literal, else the mnemonic.
    pub fn label(&self) -> String {
        match &self.value {
            Some(value) => value.to_string(),
            None => self.kind.clone(),
        }
    }
}

impl TryFrom<ElementDocument> for ScriptElement {
    type Error = SnapshotError;

    fn try_from(doc: ElementDocument) -> Result<Self, Self::Error> {
        ScriptElement::new(doc.kind, doc.value)
    }
}

impl From<ScriptElement> for ElementDocument {
    fn from(element: ScriptElement) -> Self {
        Self {
            kind: element.kind,
            value: element.value,
        }
    }
}

impl std::fmt::Display for ScriptElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
