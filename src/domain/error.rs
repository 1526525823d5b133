//! Domain-level errors (no external dependencies)

use std::fmt::Debug;

use thiserror::Error;

/// Errors raised by the checked variants of the forest algorithms.
///
/// The base algorithms (`walk`, `make`) never fail; these are only produced by
/// `walk_checked` and `make_strict`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError<Id: Debug> {
    #[error("duplicate node id: {id:?}")]
    DuplicateId { id: Id },

    #[error("cycle detected in hierarchy at node {id:?} (parent {parent_id:?})")]
    CycleDetected { id: Id, parent_id: Id },
}

/// Result type for tree operations.
pub type TreeResult<T, Id> = Result<T, TreeError<Id>>;
