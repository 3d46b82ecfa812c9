//! Contains the constraint implementations.
//!
//! See [`crate::propagation`] for info on constraints. The composite constraints of the
//! all-different family post the propagators which match the requested
//! [`PropagationStrength`](crate::PropagationStrength) and are entailed afterwards.

pub(crate) mod all_different;
pub(crate) mod arithmetic;
pub(crate) mod global_cardinality;
pub(crate) mod matching;
pub(crate) mod nvalue;

pub(crate) use all_different::AllDifferent;
pub(crate) use arithmetic::*;
pub(crate) use global_cardinality::GlobalCardinality;
pub(crate) use nvalue::AtLeastNValue;
