//! A finite-domain constraint propagation engine.
//!
//! The engine maintains integer variables with reversible domains and a set of constraints over
//! them. Constraints narrow domains until nothing more can be deduced (a fixed point) or a domain
//! would become empty (a failure). Nested choice points make it possible for a search procedure to
//! explore alternatives and undo all domain changes in time proportional to the number of changed
//! cells.
//!
//! # Example
//! ```
//! use fdprop_core::constraints;
//! use fdprop_core::propagation::ReadDomains;
//! use fdprop_core::PropagationStrength;
//! use fdprop_core::Store;
//!
//! let mut store = Store::default();
//! let x = store.new_interval_variable(1, 3);
//! let y = store.new_interval_variable(1, 3);
//! let z = store.new_interval_variable(1, 3);
//!
//! store
//!     .post(constraints::all_different(vec![x, y, z]), PropagationStrength::Strong)
//!     .expect("the constraint is satisfiable");
//!
//! store.push_state();
//! store.assign(&x, 2).expect("2 is in the domain of x");
//!
//! // Forward checking removes the value immediately.
//! assert!(!store.contains(&y, 2));
//! assert!(!store.contains(&z, 2));
//!
//! store.pop();
//! assert!(store.contains(&y, 2));
//! ```
pub(crate) mod basic_types;
pub mod constraints;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod fdprop_asserts;
pub(crate) mod math;
pub mod propagation;
pub(crate) mod propagators;
pub mod statistics;

pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::EmptyDomain;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::Outcome;
pub use crate::basic_types::PropagationStatus;
pub use crate::basic_types::PropagationStrength;
pub use crate::engine::Store;
pub use crate::engine::StoreOptions;
pub use crate::engine::TrailedInteger;

/// Contains the variable types and the events which can be observed on them.
pub mod variables {
    pub use crate::engine::notifications::DirectEvent;
    pub use crate::engine::notifications::DirectEventKind;
    pub use crate::engine::notifications::DomainEvent;
    pub use crate::engine::variables::AffineView;
    pub use crate::engine::variables::DomainId;
    pub use crate::engine::variables::IntegerVariable;
    pub use crate::engine::variables::TransformableVariable;
    pub use crate::engine::Watchers;
}
