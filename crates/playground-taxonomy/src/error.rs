//! Error types for building a taxonomy.

use crate::category::Category;

/// Errors raised while building a [`Taxonomy`](crate::Taxonomy) from a category table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    /// The same element kind is listed under two categories.
    #[error("'{kind}' is listed under both {first} and {second}")]
    DuplicateMember {
        /// The element kind listed twice.
        kind: String,
        /// The category it was first listed under.
        first: Category,
        /// The category that listed it again.
        second: Category,
    },

    /// A category has no members.
    #[error("category {0} has no members")]
    EmptyCategory(Category),
}
