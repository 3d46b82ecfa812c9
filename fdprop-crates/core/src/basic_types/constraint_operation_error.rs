use thiserror::Error;

/// Errors related to posting constraints on a [`Store`](crate::Store).
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error("Posting the constraint led to a failure")]
    InfeasibleConstraint,
    #[error("Constraints cannot be posted on a failed store")]
    InfeasibleState,
}
