mod assignments;
mod domain;
mod propagator_queue;
pub(crate) mod trailed;

pub(crate) use assignments::Assignments;
pub(crate) use domain::IntegerDomainIterator;
pub(crate) use propagator_queue::PropagatorQueue;
pub use trailed::TrailedInteger;
pub(crate) use trailed::TrailedValues;
