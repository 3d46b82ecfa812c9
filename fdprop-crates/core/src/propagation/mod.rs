//! Contains the main building blocks for constraints.
//!
//! # Background
//!
//! A constraint (or rather, its propagator) takes as input a set of variables
//! (<code>x<sub>i</sub> ∈ X</code>) and for each variable a corresponding domain
//! (<code>D<sub>i</sub> ∈ D</code>); it can then be seen as a function which maps `D ↦ D'` such
//! that <code>D'<sub>i</sub> ⊆ D<sub>i</sub></code> for all variables (i.e. the domain of a
//! variable either remains the same after applying the constraint or it becomes a subset of the
//! domain before applying the constraint).
//!
//! A constraint is said to be at fix-point if <code>D = D'</code>, meaning that no further
//! propagations can take place when applying it. A constraint is said to be "idempotent" if a
//! single call to it will result in it being at fix-point.
//!
//! # Practical
//!
//! Each concrete constraint implements the [`Constraint`] trait. In [`Constraint::setup`] it
//! subscribes to the events it is interested in through the [`SetupContext`], and performs its
//! initial propagation. Afterwards it is driven by the [`Store`](crate::Store):
//! - events subscribed with `call_propagate_when_*` enqueue the constraint, and
//!   [`Constraint::propagate`] is called when it is dequeued;
//! - events subscribed with the other `call_*` methods are delivered immediately through
//!   [`Constraint::notify`], before the change is reported to enqueued subscribers.
//!
//! A constraint which delegates its work to other constraints may post them from within
//! [`Constraint::setup`] through [`PropagationContext::post`], and report
//! [`Outcome::Success`](crate::Outcome::Success) itself.
//!
//! # Bibliography
//!
//! \[1\] C. Schulte and P. J. Stuckey, ‘Efficient constraint propagation engines’, ACM Transactions
//! on Programming Languages and Systems (TOPLAS), vol. 31, no. 1, pp. 1–43, 2008.

mod constraint;
mod constraint_id;
pub(crate) mod constraint_store;
pub(crate) mod contexts;
mod local_id;

pub use constraint::*;
pub use constraint_id::ConstraintId;
pub use constraint_store::ConstraintHandle;
pub use contexts::PropagationContext;
pub use contexts::ReadDomains;
pub use contexts::SetupContext;
pub use local_id::LocalId;

pub use crate::engine::notifications::DirectEvent;
pub use crate::engine::notifications::DirectEventKind;
pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::TrailedInteger;
