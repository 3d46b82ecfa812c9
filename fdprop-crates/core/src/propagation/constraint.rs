use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::LocalId;
use super::PropagationContext;
use super::SetupContext;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::notifications::DirectEvent;
#[cfg(doc)]
use crate::engine::notifications::DomainEvent;
use crate::engine::variables::DomainId;
use crate::statistics::StatisticLogger;

// We need this to cast from `Box<dyn Constraint>` to the concrete type behind a
// `ConstraintHandle`; rust inherently does not allow downcasting from a trait object.
impl_downcast!(Constraint);

/// A constraint removes values from domains which cannot be part of any solution, or reports
/// that the current domains are inconsistent.
///
/// A constraint is handed to the store through [`Store::post`](crate::Store::post), which calls
/// [`Constraint::setup`] exactly once. From then on the constraint is invoked in two ways:
/// - [`Constraint::propagate`], when it is dequeued after one of the [`DomainEvent`]s it
///   subscribed to happened;
/// - [`Constraint::notify`], synchronously, while a domain it subscribed to directly is being
///   changed.
///
/// Both return [`Outcome::Suspend`](crate::Outcome::Suspend) to keep the constraint active,
/// [`Outcome::Success`](crate::Outcome::Success) when it is entailed under the current domains,
/// or an [`Inconsistency`](crate::Inconsistency) when it cannot be satisfied. An entailed
/// constraint is not invoked again until the store pops back past the choice point at which it
/// became entailed.
///
/// A constraint is never invoked while one of its own methods is running; domain changes it makes
/// to its own variables are not reported back to it, except that a constraint which is not
/// [`Constraint::idempotent`] is enqueued again. Changes made by other constraints while it runs
/// enqueue it as usual.
pub trait Constraint: Downcast {
    /// Return the name of the constraint.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// The priority with which the constraint is propagated. The store drains all constraints of a
    /// higher priority before considering a lower one.
    ///
    /// By default the priority is set to [`Priority::VeryLow`].
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Whether a call to [`Constraint::propagate`] is guaranteed to reach a fixed point of the
    /// constraint, so that it need not be enqueued because of its own changes.
    fn idempotent(&self) -> bool {
        false
    }

    /// Registers the subscriptions of the constraint and performs the initial propagation, which
    /// must remove the same values as a call to [`Constraint::propagate`] would.
    fn setup(
        &mut self,
        context: SetupContext<'_>,
        strength: PropagationStrength,
    ) -> PropagationStatus;

    /// Removes values which cannot be part of a solution under the current domains.
    fn propagate(&mut self, context: PropagationContext<'_>) -> PropagationStatus;

    /// Called while a domain the constraint subscribed to directly is being changed.
    ///
    /// Only constraints which registered for direct events through the [`SetupContext`] receive
    /// them; the default implementation therefore treats a call as a programming error.
    fn notify(
        &mut self,
        _context: PropagationContext<'_>,
        _source: EventSource,
        _event: DirectEvent,
    ) -> PropagationStatus {
        panic!(
            "Constraint {} registered for direct events it does not handle.",
            self.name()
        );
    }

    /// Logs statistics of the constraint using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Identifies the subscription which caused a direct notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventSource {
    /// The domain which changed.
    pub domain: DomainId,
    /// The id given when subscribing, if any.
    pub local_id: Option<LocalId>,
}

/// The priority of a constraint or of a direct subscription.
///
/// Constraints with high priority are propagated before constraints with low(er) priority. If two
/// constraints have the same priority, they are propagated in the order in which they were
/// enqueued.
///
/// Typically, constraints with low computational complexity should be assigned a high priority.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    VeryLow = 3,
}

impl Priority {
    pub(crate) const NUM_PRIORITIES: u32 = 4;
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        ((*self) as u8).partial_cmp(&((*other) as u8))
    }
}
