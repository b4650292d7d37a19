//! Submodule defining the errors used across the crate.

/// Errors raised when a statement matches a simplification rule's leading
/// keyword but lacks the structure the rule relies on.
///
/// Fingerprints are compared for equivalence, so a statement outside the
/// supported shape fails instead of producing a misleading fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An `UPDATE` statement without a `SET` keyword.
    #[error("UPDATE statement has no SET keyword")]
    MissingSet,
    /// An `IN` inside a `WHERE` clause with no parenthesis after it.
    #[error("IN at position {in_index} of WHERE clause is not followed by a parenthesis")]
    MissingInList {
        /// Index of the `IN` token among the clause's children.
        in_index: usize,
    },
    /// A savepoint statement whose name is not an identifier group.
    #[error("Savepoint statement has no identifier at child {name_index}")]
    MalformedSavepoint {
        /// Index of the child expected to hold the savepoint name.
        name_index: usize,
    },
}
