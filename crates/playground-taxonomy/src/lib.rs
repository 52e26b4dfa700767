#![deny(missing_docs)]

//! Script element taxonomy.
//!
//! Maps the element kinds reported by the script interpreter (opcode
//! mnemonics such as `OP_DUP`, or the literal markers `ScriptConstant` and
//! `ScriptNum`) onto a fixed set of display categories.
//!
//! ```
//! use playground_taxonomy::{classify, Category};
//!
//! assert_eq!(classify("OP_HASH160"), Some(Category::CryptoOps));
//! assert_eq!(classify("OP_SOMETHING_NEW"), None);
//! ```

pub mod category;
pub mod error;
pub mod table;

pub use category::Category;
pub use error::TaxonomyError;
pub use table::{classify, is_consistent, is_literal_marker, Taxonomy, LITERAL_MARKERS, SCRIPT_CONSTANT, SCRIPT_NUM};
