use std::fmt::Debug;

use enumset::EnumSet;

use super::TransformableVariable;
use crate::basic_types::Inconsistency;
use crate::engine::notifications::DirectEventKind;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::Assignments;
use crate::engine::Store;
use crate::propagation::LocalId;
use crate::propagation::Priority;

/// The behaviour of an integer variable: querying its domain, changing it, and subscribing to
/// changes.
///
/// Changes go through the [`Store`] so that subscribers are notified; a change which does not
/// alter the domain returns `Ok` without notifying anyone.
pub trait IntegerVariable: Clone + Debug + TransformableVariable<Self::AffineView> {
    type AffineView: IntegerVariable;

    /// Get the lower bound of the variable.
    fn lower_bound(&self, assignments: &Assignments) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, assignments: &Assignments) -> i32;

    /// Get the number of values in the domain of the variable.
    fn size(&self, assignments: &Assignments) -> usize;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, assignments: &Assignments, value: i32) -> bool;

    /// The smallest value in the domain strictly greater than `value`.
    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// The largest value in the domain strictly smaller than `value`.
    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32>;

    /// Iterate over the values of the domain in ascending order.
    fn iterate_domain<'a>(
        &'a self,
        assignments: &'a Assignments,
    ) -> impl Iterator<Item = i32> + 'a {
        std::iter::successors(Some(self.lower_bound(assignments)), move |&value| {
            self.next_value(assignments, value)
        })
    }

    /// Remove `value` from the domain.
    fn remove(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency>;

    /// Remove all values smaller than `value`.
    fn set_lower_bound(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency>;

    /// Remove all values greater than `value`.
    fn set_upper_bound(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency>;

    /// Remove all values except `value`.
    fn assign(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency>;

    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>);

    /// Register a watch for this variable on the given direct events.
    fn watch_direct(
        &self,
        watchers: &mut Watchers<'_>,
        kinds: EnumSet<DirectEventKind>,
        local_id: Option<LocalId>,
        priority: Priority,
    );
}
