use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the module ordering operations.
///
/// Malformed prerequisite references are deliberately absent: those degrade
/// to "ignored" at evaluation time and are never an error.
#[derive(Debug, Error)]
pub enum OrderingError {
    /// The target position cannot be resolved to a valid 1-based slot, or
    /// the module is not part of the course's non-deleted set.
    #[error("position must resolve to a valid slot in the module sequence")]
    InvalidPosition,

    /// A batch operation's id list resolved to an empty module set.
    #[error("no modules found for the given ids")]
    NoModulesFound,

    #[error(transparent)]
    Db(#[from] DbErr),
}
