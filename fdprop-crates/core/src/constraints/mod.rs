//! Defines the constraints which can be posted to a [`Store`](crate::Store) out of the box.
//!
//! A constraint is a relation over variables. Each function returns an [`impl
//! Constraint`](Constraint) which is handed to [`Store::post`](crate::Store::post) together with
//! the [`PropagationStrength`](crate::PropagationStrength) it should be enforced with.
//!
//! # Example
//! ```
//! # use fdprop_core::constraints;
//! # use fdprop_core::propagation::ReadDomains;
//! # use fdprop_core::PropagationStrength;
//! # use fdprop_core::Store;
//! let mut store = Store::default();
//!
//! let a = store.new_interval_variable(0, 3);
//! let b = store.new_interval_variable(0, 3);
//!
//! store
//!     .post(constraints::less_than(a, b), PropagationStrength::Weak)
//!     .expect("a can be smaller than b");
//!
//! assert_eq!(2, store.upper_bound(&a));
//! assert_eq!(1, store.lower_bound(&b));
//! ```

mod all_different;
mod arithmetic;
mod cardinality;

pub use all_different::*;
pub use arithmetic::*;
pub use cardinality::*;

pub use crate::propagation::Constraint;
