//! The events which can happen on a domain and the subscriptions of constraints to them.
//!
//! Constraints subscribe in two ways:
//! - to a [`DomainEvent`], after which they are enqueued for propagation whenever the event
//!   happens;
//! - to a [`DirectEventKind`], after which they are called synchronously through
//!   [`Constraint::notify`](crate::propagation::Constraint::notify) while the domain is being
//!   changed.
mod domain_events;
mod watch_lists;

pub use domain_events::DirectEvent;
pub use domain_events::DirectEventKind;
pub use domain_events::DomainEvent;
pub(crate) use watch_lists::WatchLists;
pub use watch_lists::Watchers;
