mod constraint_operation_error;
mod propagation_status;
mod propagation_strength;
mod trail;

pub use constraint_operation_error::ConstraintOperationError;
pub use propagation_status::EmptyDomain;
pub use propagation_status::Inconsistency;
pub use propagation_status::Outcome;
pub use propagation_status::PropagationStatus;
pub use propagation_strength::PropagationStrength;
pub(crate) use trail::Trail;
