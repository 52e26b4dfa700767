//! The category membership table and its reverse index.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::category::Category;
use crate::error::TaxonomyError;

/// Element kind of a raw byte-string push.
pub const SCRIPT_CONSTANT: &str = "ScriptConstant";
/// Element kind of a numeric push.
pub const SCRIPT_NUM: &str = "ScriptNum";

/// Element kinds that carry a literal value instead of naming an opcode.
pub const LITERAL_MARKERS: &[&str] = &[SCRIPT_CONSTANT, SCRIPT_NUM];

/// Stack manipulation opcodes.
pub const STACK_OPS: &[&str] = &[
    "OP_TOALTSTACK", "OP_FROMALTSTACK", "OP_2DROP", "OP_2DUP", "OP_3DUP", "OP_2OVER",
    "OP_2ROT", "OP_2SWAP", "OP_IFDUP", "OP_DEPTH", "OP_DROP", "OP_DUP", "OP_NIP", "OP_OVER",
    "OP_PICK", "OP_ROLL", "OP_ROT", "OP_SWAP", "OP_TUCK",
];

/// Hashing and signature-checking opcodes.
pub const CRYPTO_OPS: &[&str] = &[
    "OP_RIPEMD160", "OP_SHA1", "OP_SHA256", "OP_HASH160", "OP_HASH256", "OP_CODESEPARATOR",
    "OP_CHECKSIG", "OP_CHECKSIGVERIFY", "OP_CHECKMULTISIG", "OP_CHECKMULTISIGVERIFY",
];

/// Opcodes that push constants or introduce push data.
pub const CONSTANT_OPS: &[&str] = &[
    "OP_0", "OP_FALSE", "OP_PUSHDATA1", "OP_PUSHDATA2", "OP_PUSHDATA4", "OP_1NEGATE",
    "OP_1", "OP_TRUE", "OP_2", "OP_3", "OP_4", "OP_5", "OP_6", "OP_7", "OP_8", "OP_9", "OP_10",
    "OP_11", "OP_12", "OP_13", "OP_14", "OP_15", "OP_16", "OP_PUSHDATA",
];

/// Bitwise logic and equality opcodes.
pub const BITWISE_LOGIC_OPS: &[&str] = &[
    "OP_INVERT", "OP_AND", "OP_OR", "OP_XOR", "OP_EQUAL", "OP_EQUALVERIFY",
];

/// Numeric opcodes.
pub const ARITHMETIC_OPS: &[&str] = &[
    "OP_1ADD", "OP_1SUB", "OP_2MUL", "OP_2DIV", "OP_NEGATE", "OP_ABS", "OP_NOT", "OP_0NOTEQUAL",
    "OP_ADD", "OP_SUB", "OP_MUL", "OP_DIV", "OP_MOD", "OP_LSHIFT", "OP_RSHIFT", "OP_BOOLAND",
    "OP_BOOLOR", "OP_NUMEQUAL", "OP_NUMEQUALVERIFY", "OP_NUMNOTEQUAL", "OP_LESSTHAN",
    "OP_GREATERTHAN", "OP_LESSTHANOREQUAL", "OP_GREATERTHANOREQUAL", "OP_MIN", "OP_MAX",
    "OP_WITHIN",
];

/// Conditional and terminating opcodes.
pub const FLOW_CONTROL_OPS: &[&str] = &[
    "OP_NOP", "OP_IF", "OP_NOTIF", "OP_ELSE", "OP_ENDIF", "OP_VERIFY", "OP_RETURN",
];

/// Locktime opcodes, including the NOPs they were assigned to.
pub const LOCKTIME_OPS: &[&str] = &[
    "OP_CHECKLOCKTIMEVERIFY", "OP_CHECKSEQUENCEVERIFY", "OP_NOP2", "OP_NOP3",
];

/// Template placeholders that never appear in a real script.
pub const PSEUDO_OPS: &[&str] = &["OP_PUBKEYHASH", "OP_PUBKEY", "OP_INVALIDOPCODE"];

/// Reserved opcodes and the unassigned NOPs.
pub const RESERVED_OPS: &[&str] = &[
    "OP_RESERVED", "OP_VER", "OP_VERIF", "OP_VERNOTIF", "OP_RESERVED1", "OP_RESERVED2",
    "OP_NOP1", "OP_NOP4", "OP_NOP5", "OP_NOP6", "OP_NOP7", "OP_NOP8", "OP_NOP9", "OP_NOP10",
];

/// Byte-string splice opcodes.
pub const SPLICE_OPS: &[&str] = &["OP_CAT", "OP_SUBSTR", "OP_LEFT", "OP_RIGHT", "OP_SIZE"];

/// The standard category table used by [`classify`].
pub const STANDARD_TABLE: &[(Category, &[&str])] = &[
    (Category::Values, LITERAL_MARKERS),
    (Category::StackOps, STACK_OPS),
    (Category::CryptoOps, CRYPTO_OPS),
    (Category::ConstantOps, CONSTANT_OPS),
    (Category::BitwiseLogicOps, BITWISE_LOGIC_OPS),
    (Category::ArithmeticOps, ARITHMETIC_OPS),
    (Category::FlowControlOps, FLOW_CONTROL_OPS),
    (Category::LocktimeOps, LOCKTIME_OPS),
    (Category::PseudoOps, PSEUDO_OPS),
    (Category::ReservedOps, RESERVED_OPS),
    (Category::SpliceOps, SPLICE_OPS),
];

const fn same_kind(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Returns `true` if every category has members and no kind is listed twice.
///
/// Usable in const context; [`STANDARD_TABLE`] is checked with it at
/// compile time.
pub const fn is_consistent(table: &[(Category, &[&str])]) -> bool {
    let mut c1 = 0;
    while c1 < table.len() {
        let members = table[c1].1;
        if members.is_empty() {
            return false;
        }
        let mut m1 = 0;
        while m1 < members.len() {
            let mut c2 = c1;
            while c2 < table.len() {
                let others = table[c2].1;
                let mut m2 = if c2 == c1 { m1 + 1 } else { 0 };
                while m2 < others.len() {
                    if same_kind(members[m1], others[m2]) {
                        return false;
                    }
                    m2 += 1;
                }
                c2 += 1;
            }
            m1 += 1;
        }
        c1 += 1;
    }
    true
}

const _: () = assert!(
    is_consistent(STANDARD_TABLE),
    "standard opcode table lists a kind twice or has an empty category"
);

static STANDARD: OnceLock<Result<Taxonomy, TaxonomyError>> = OnceLock::new();

/// A reverse index from element kind to its category.
///
/// Built once from a category table. Construction rejects tables in which
/// the same kind is listed under two categories.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    index: HashMap<&'static str, Category>,
}

impl Taxonomy {
    /// Build the reverse index for a category table.
    pub fn new(table: &[(Category, &'static [&'static str])]) -> Result<Self, TaxonomyError> {
        let mut index = HashMap::new();

        for (category, members) in table {
            if members.is_empty() {
                return Err(TaxonomyError::EmptyCategory(*category));
            }

            for &kind in members.iter() {
                if let Some(first) = index.insert(kind, *category) {
                    return Err(TaxonomyError::DuplicateMember {
                        kind: kind.to_string(),
                        first,
                        second: *category,
                    });
                }
            }
        }

        Ok(Self { index })
    }

    /// Build the process-wide taxonomy from [`STANDARD_TABLE`].
    ///
    /// Call once at startup so an inconsistent table is reported before the
    /// first lookup. Later calls return the same index.
    pub fn init() -> Result<&'static Taxonomy, TaxonomyError> {
        STANDARD
            .get_or_init(|| Taxonomy::new(STANDARD_TABLE))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The process-wide taxonomy built from [`STANDARD_TABLE`].
    ///
    /// # Panics
    ///
    /// Panics if the standard table is inconsistent, which [`Taxonomy::init`]
    /// reports as an error instead.
    pub fn standard() -> &'static Taxonomy {
        match Self::init() {
            Ok(taxonomy) => taxonomy,
            Err(e) => panic!("standard opcode table is inconsistent: {e}"),
        }
    }

    /// Look up the category of an element kind.
    pub fn classify(&self, kind: &str) -> Option<Category> {
        self.index.get(kind).copied()
    }

    /// Number of distinct kinds in the index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the index holds no kinds.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate the kinds belonging to `category`, in no particular order.
    pub fn members(&self, category: Category) -> impl Iterator<Item = &'static str> + '_ {
        self.index
            .iter()
            .filter(move |(_, c)| **c == category)
            .map(|(kind, _)| *kind)
    }
}

/// Classify an element kind against the standard table.
///
/// Unknown kinds yield `None` so that new interpreter vocabulary renders as
/// unclassified instead of failing.
pub fn classify(kind: &str) -> Option<Category> {
    Taxonomy::standard().classify(kind)
}

/// Returns `true` if `kind` marks a literal value rather than an opcode.
pub fn is_literal_marker(kind: &str) -> bool {
    LITERAL_MARKERS.contains(&kind)
}
