//! Display categories for script elements.

use serde::{Deserialize, Serialize};

/// A display category for a script element.
///
/// The serialized form matches the names used by the playground front end
/// as style class names (`StackOps`, `CryptoOps`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Literal values pushed by the script (`ScriptConstant`, `ScriptNum`).
    Values,
    /// Stack manipulation opcodes.
    StackOps,
    /// Hashing and signature checking opcodes.
    CryptoOps,
    /// Constant and push-data opcodes.
    ConstantOps,
    /// Bitwise logic and equality opcodes.
    BitwiseLogicOps,
    /// Numeric opcodes.
    ArithmeticOps,
    /// Conditionals, `OP_VERIFY` and `OP_RETURN`.
    FlowControlOps,
    /// Absolute and relative lock time checks.
    LocktimeOps,
    /// Template-matching pseudo opcodes.
    PseudoOps,
    /// Reserved words and upgradable NOPs.
    ReservedOps,
    /// String splicing opcodes.
    SpliceOps,
}

impl Category {
    /// Every category, in table order.
    pub const ALL: [Category; 11] = [
        Category::Values,
        Category::StackOps,
        Category::CryptoOps,
        Category::ConstantOps,
        Category::BitwiseLogicOps,
        Category::ArithmeticOps,
        Category::FlowControlOps,
        Category::LocktimeOps,
        Category::PseudoOps,
        Category::ReservedOps,
        Category::SpliceOps,
    ];

    /// Returns the stable name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Values => "Values",
            Self::StackOps => "StackOps",
            Self::CryptoOps => "CryptoOps",
            Self::ConstantOps => "ConstantOps",
            Self::BitwiseLogicOps => "BitwiseLogicOps",
            Self::ArithmeticOps => "ArithmeticOps",
            Self::FlowControlOps => "FlowControlOps",
            Self::LocktimeOps => "LocktimeOps",
            Self::PseudoOps => "PseudoOps",
            Self::ReservedOps => "ReservedOps",
            Self::SpliceOps => "SpliceOps",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
