use enumset::EnumSet;
use log::debug;
use log::trace;

use crate::basic_types::ConstraintOperationError;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Inconsistency;
use crate::basic_types::Outcome;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::create_statistics_struct;
use crate::engine::notifications::DirectEvent;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::WatchLists;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::engine::PropagatorQueue;
use crate::engine::StoreOptions;
use crate::fdprop_asserts::fdprop_assert_simple;
use crate::fdprop_asserts::print_fdprop_assert_warning_message;
use crate::propagation::constraint_store::ConstraintStore;
use crate::propagation::contexts::private::HasAssignments;
use crate::propagation::Constraint;
use crate::propagation::ConstraintHandle;
use crate::propagation::ConstraintId;
use crate::propagation::EventSource;
use crate::propagation::PropagationContext;
use crate::propagation::SetupContext;
use crate::statistics::log_statistic;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The store owns the variables, the constraints posted on them and all reversible state, and
/// drives propagation.
///
/// Domains are read through [`ReadDomains`](crate::propagation::ReadDomains). Changes made to a
/// domain are reported to the constraints subscribed to it: direct subscribers are called
/// immediately, the others are enqueued and run by [`Store::propagate`] (or as part of
/// [`Store::post`]).
///
/// # Example
/// ```
/// use fdprop_core::propagation::ReadDomains;
/// use fdprop_core::Store;
///
/// let mut store = Store::default();
/// let x = store.new_interval_variable(0, 10);
///
/// store.push_state();
/// store.update_min(&x, 4).expect("the domain does not become empty");
/// assert_eq!(store.lower_bound(&x), 4);
///
/// store.pop();
/// assert_eq!(store.lower_bound(&x), 0);
/// ```
#[derive(Debug)]
pub struct Store {
    options: StoreOptions,
    /// The domains and every other reversible cell.
    assignments: Assignments,
    /// The subscriptions of constraints to domain events.
    watch_lists: WatchLists,
    /// The arena which owns the posted constraints.
    constraints: ConstraintStore,
    /// The constraints waiting to be propagated.
    queue: PropagatorQueue,
    /// The constraints whose methods are currently running, innermost last.
    running: Vec<ConstraintId>,
    /// The checkpoint at which the store failed, if it did.
    failed_at: Option<usize>,
    statistics: StoreStatistics,
}

create_statistics_struct!(
    /// Counters of the work performed by a [`Store`].
    StoreStatistics {
        num_constraints_posted: u64,
        num_propagate_calls: u64,
        num_direct_notifications: u64,
        num_enqueues: u64,
        num_failures: u64,
        num_checkpoints_pushed: u64,
        num_checkpoints_popped: u64,
        num_trail_entries_restored: u64,
});

impl Default for Store {
    fn default() -> Self {
        Store::new(StoreOptions::default())
    }
}

impl HasAssignments for Store {
    fn assignments(&self) -> &Assignments {
        &self.assignments
    }
}

impl Store {
    pub fn new(options: StoreOptions) -> Self {
        print_fdprop_assert_warning_message!();

        Store {
            options,
            assignments: Assignments::default(),
            watch_lists: WatchLists::default(),
            constraints: ConstraintStore::default(),
            queue: PropagatorQueue::default(),
            running: Vec::new(),
            failed_at: None,
            statistics: StoreStatistics::default(),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub(crate) fn assignments_mut(&mut self) -> &mut Assignments {
        &mut self.assignments
    }

    pub(crate) fn watch_lists_mut(&mut self) -> &mut WatchLists {
        &mut self.watch_lists
    }
}

// Variables.
impl Store {
    /// Creates a variable with the domain `[lower_bound, upper_bound]`.
    ///
    /// Panics if the domain would be empty.
    pub fn new_interval_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let domain_id = self.assignments.grow(lower_bound, upper_bound);
        self.watch_lists.grow();
        domain_id
    }

    /// Creates a variable whose domain consists of the given values.
    ///
    /// Panics if no values are given.
    pub fn new_sparse_variable(&mut self, values: impl IntoIterator<Item = i32>) -> DomainId {
        let domain_id = self
            .assignments
            .create_new_integer_variable_sparse(values.into_iter().collect());
        self.watch_lists.grow();
        domain_id
    }

    pub fn num_variables(&self) -> u32 {
        self.assignments.num_domains()
    }

    /// All variables in the order in which they were created.
    pub fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.assignments.get_domains()
    }
}

// Choice points.
impl Store {
    /// Creates a choice point to which [`Store::pop`] returns.
    ///
    /// Creating a choice point while constraints are waiting to be propagated is allowed; popping
    /// it puts back exactly the constraints which were waiting, even if they were propagated in
    /// the meantime.
    pub fn push_state(&mut self) {
        self.assignments.new_checkpoint();
        self.queue.new_checkpoint();
        self.statistics.num_checkpoints_pushed += 1;

        debug!("Pushed choice point {}", self.get_checkpoint());
    }

    /// Undoes every change made since the last [`Store::push_state`].
    ///
    /// Panics when there is no choice point to return to.
    pub fn pop(&mut self) {
        fdprop_assert_simple!(self.get_checkpoint() > 0, "Cannot pop below the root.");
        self.restore_to(self.get_checkpoint() - 1);
    }

    /// Undoes every change made since the choice point `checkpoint` was the current one.
    ///
    /// Panics if `checkpoint` is not smaller than the current checkpoint.
    pub fn restore_to(&mut self, checkpoint: usize) {
        fdprop_assert_simple!(
            checkpoint < self.get_checkpoint(),
            "Can only restore to an earlier checkpoint, current {} requested {checkpoint}.",
            self.get_checkpoint()
        );

        self.statistics.num_checkpoints_popped += (self.get_checkpoint() - checkpoint) as u64;

        let num_restored = self.assignments.synchronise(checkpoint);
        self.queue.synchronise(checkpoint);
        self.statistics.num_trail_entries_restored += num_restored as u64;

        if self
            .failed_at
            .is_some_and(|failed_at| failed_at > checkpoint)
        {
            self.failed_at = None;
        }

        debug!("Restored to choice point {checkpoint}, undoing {num_restored} changes");
    }

    /// The number of choice points which are currently open.
    pub fn get_checkpoint(&self) -> usize {
        self.assignments.get_checkpoint()
    }

    /// Returns `true` if a domain became empty or a constraint detected an inconsistency since
    /// the current choice point (or an earlier one) was created.
    ///
    /// A store which failed at the root stays failed.
    pub fn is_failed(&self) -> bool {
        self.failed_at.is_some()
    }
}

// Constraints.
impl Store {
    /// Posts the constraint, sets it up and propagates to a fixed point.
    ///
    /// If the store already failed, the constraint is not posted and
    /// [`ConstraintOperationError::InfeasibleState`] is returned. If the setup or the subsequent
    /// propagation fails, the store is failed and
    /// [`ConstraintOperationError::InfeasibleConstraint`] is returned.
    ///
    /// A constraint posted after [`Store::push_state`] is removed again by the matching
    /// [`Store::pop`].
    pub fn post<C: Constraint>(
        &mut self,
        constraint: C,
        strength: PropagationStrength,
    ) -> Result<ConstraintHandle<C>, ConstraintOperationError> {
        if self.is_failed() {
            return Err(ConstraintOperationError::InfeasibleState);
        }

        let constraint_id = self
            .add_constraint(Box::new(constraint), strength)
            .and_then(|constraint_id| {
                self.propagate_to_fixed_point()?;
                Ok(constraint_id)
            })
            .map_err(|_| ConstraintOperationError::InfeasibleConstraint)?;

        Ok(ConstraintHandle::new(constraint_id))
    }

    /// Posts the constraint with [`StoreOptions::default_strength`].
    pub fn post_default<C: Constraint>(
        &mut self,
        constraint: C,
    ) -> Result<ConstraintHandle<C>, ConstraintOperationError> {
        self.post(constraint, self.options.default_strength)
    }

    /// The number of constraints which were ever posted, including the ones which are no longer
    /// active.
    pub fn num_constraints(&self) -> usize {
        self.constraints.num_constraints()
    }

    /// Gives access to a posted constraint.
    pub fn get_constraint<C: Constraint>(&self, handle: ConstraintHandle<C>) -> Option<&C> {
        self.constraints
            .get(handle.id())
            .and_then(|constraint| constraint.downcast_ref())
    }

    /// Returns `false` once the constraint is entailed, or after restoring to a choice point
    /// before it was posted.
    pub fn is_active<C>(&self, handle: ConstraintHandle<C>) -> bool {
        self.constraints.is_active(handle.id(), &self.assignments)
    }

    /// Registers the constraint and calls its setup.
    ///
    /// The propagation which is triggered is only enqueued; this is what makes posting from
    /// within a running constraint join the fixed point which is already being computed.
    pub(crate) fn add_constraint(
        &mut self,
        constraint: Box<dyn Constraint>,
        strength: PropagationStrength,
    ) -> Result<ConstraintId, Inconsistency> {
        let active = self.assignments.new_trailed_integer(0);
        let constraint_id = self.constraints.alloc(constraint.as_ref(), active);
        self.assignments.write_trailed_integer(active, 1);
        self.statistics.num_constraints_posted += 1;

        debug!(
            "Posting {} as {constraint_id} with strength {strength}",
            constraint.name()
        );

        let mut constraint = constraint;
        self.running.push(constraint_id);
        let status = constraint.setup(SetupContext::new(self, constraint_id), strength);
        let _ = self.running.pop();
        self.constraints.put_back(constraint_id, constraint);
        self.handle_status(constraint_id, status)?;

        Ok(constraint_id)
    }
}

// Domain changes requested from outside of the constraints.
impl Store {
    /// Assigns the variable. Subscribed constraints are notified, but only the direct
    /// subscribers run before [`Store::propagate`] is called.
    pub fn assign<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), Inconsistency> {
        self.check_not_failed()?;
        var.assign(self, value)
    }

    pub fn update_min<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<(), Inconsistency> {
        self.check_not_failed()?;
        var.set_lower_bound(self, bound)
    }

    pub fn update_max<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<(), Inconsistency> {
        self.check_not_failed()?;
        var.set_upper_bound(self, bound)
    }

    pub fn remove_value<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), Inconsistency> {
        self.check_not_failed()?;
        var.remove(self, value)
    }

    /// Runs the enqueued constraints until a fixed point is reached or the store fails.
    pub fn propagate(&mut self) -> Result<(), Inconsistency> {
        self.check_not_failed()?;
        self.propagate_to_fixed_point()
    }

    fn check_not_failed(&self) -> Result<(), Inconsistency> {
        if self.is_failed() {
            Err(Inconsistency::Conflict)
        } else {
            Ok(())
        }
    }
}

// The mutation and notification protocol. Every change to a domain goes through one of these
// methods, which run the direct subscribers before the enqueued ones are scheduled.
impl Store {
    pub(crate) fn remove_value_from_domain(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<(), Inconsistency> {
        if !self.assignments.is_value_in_domain(domain, value) {
            return Ok(());
        }
        if self.assignments.is_domain_assigned(domain) {
            return Err(self.fail(EmptyDomain.into()));
        }

        // Removal subscribers observe the value while it is still present.
        self.notify_direct(domain, DirectEvent::Removed(value))?;
        if !self.assignments.is_value_in_domain(domain, value) {
            return Ok(());
        }

        let old_lower_bound = self.assignments.get_lower_bound(domain);
        let old_upper_bound = self.assignments.get_upper_bound(domain);
        match self.assignments.remove_value_from_domain(domain, value) {
            Ok(_) => self.notify_changes(domain, old_lower_bound, old_upper_bound),
            Err(empty_domain) => Err(self.fail(empty_domain.into())),
        }
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain: DomainId,
        new_lower_bound: i32,
    ) -> Result<(), Inconsistency> {
        let old_lower_bound = self.assignments.get_lower_bound(domain);
        let old_upper_bound = self.assignments.get_upper_bound(domain);

        match self
            .assignments
            .tighten_lower_bound(domain, new_lower_bound)
        {
            Ok(true) => self.notify_changes(domain, old_lower_bound, old_upper_bound),
            Ok(false) => Ok(()),
            Err(empty_domain) => Err(self.fail(empty_domain.into())),
        }
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain: DomainId,
        new_upper_bound: i32,
    ) -> Result<(), Inconsistency> {
        let old_lower_bound = self.assignments.get_lower_bound(domain);
        let old_upper_bound = self.assignments.get_upper_bound(domain);

        match self
            .assignments
            .tighten_upper_bound(domain, new_upper_bound)
        {
            Ok(true) => self.notify_changes(domain, old_lower_bound, old_upper_bound),
            Ok(false) => Ok(()),
            Err(empty_domain) => Err(self.fail(empty_domain.into())),
        }
    }

    pub(crate) fn make_assignment(
        &mut self,
        domain: DomainId,
        value: i32,
    ) -> Result<(), Inconsistency> {
        let old_lower_bound = self.assignments.get_lower_bound(domain);
        let old_upper_bound = self.assignments.get_upper_bound(domain);

        match self.assignments.make_assignment(domain, value) {
            Ok(true) => self.notify_changes(domain, old_lower_bound, old_upper_bound),
            Ok(false) => Ok(()),
            Err(empty_domain) => Err(self.fail(empty_domain.into())),
        }
    }

    /// Reports a change of `domain` to its subscribers. Only the events which actually happened
    /// are reported; the direct subscribers are called before the others are enqueued.
    fn notify_changes(
        &mut self,
        domain: DomainId,
        old_lower_bound: i32,
        old_upper_bound: i32,
    ) -> Result<(), Inconsistency> {
        let lower_bound = self.assignments.get_lower_bound(domain);
        let upper_bound = self.assignments.get_upper_bound(domain);

        let mut events: EnumSet<DomainEvent> = DomainEvent::Any.into();
        let mut direct_events = Vec::with_capacity(4);

        if self.assignments.is_domain_assigned(domain) {
            events |= DomainEvent::Assign;
            direct_events.push(DirectEvent::Assigned(lower_bound));
        }
        if lower_bound != old_lower_bound {
            events |= DomainEvent::LowerBound | DomainEvent::Bounds;
            direct_events.push(DirectEvent::LowerBound {
                old: old_lower_bound,
            });
        }
        if upper_bound != old_upper_bound {
            events |= DomainEvent::UpperBound | DomainEvent::Bounds;
            direct_events.push(DirectEvent::UpperBound {
                old: old_upper_bound,
            });
        }
        if lower_bound != old_lower_bound || upper_bound != old_upper_bound {
            direct_events.push(DirectEvent::Bounds {
                old_lower_bound,
                old_upper_bound,
            });
        }

        trace!("{domain} changed with events {events:?}");

        for event in direct_events {
            self.notify_direct(domain, event)?;
        }

        self.enqueue_watchers(domain, events);

        Ok(())
    }

    /// Calls the direct subscribers of `domain` for `event`, most urgent first.
    fn notify_direct(
        &mut self,
        domain: DomainId,
        event: DirectEvent,
    ) -> Result<(), Inconsistency> {
        let watches = self
            .watch_lists
            .get_direct_watchers(domain, event.kind())
            .to_vec();

        for watch in watches {
            let constraint_id = watch.constraint;
            if !self.constraints.is_active(constraint_id, &self.assignments)
                || self.constraints.is_in_flight(constraint_id)
            {
                continue;
            }

            let mut constraint = self
                .constraints
                .take(constraint_id)
                .expect("a constraint which is not in flight is in its slot");
            self.statistics.num_direct_notifications += 1;

            let source = EventSource {
                domain,
                local_id: watch.local_id,
            };
            self.running.push(constraint_id);
            let status = constraint.notify(
                PropagationContext::new(self),
                source,
                watch.transform.map_event(event),
            );
            let _ = self.running.pop();

            self.constraints.put_back(constraint_id, constraint);
            self.handle_status(constraint_id, status)?;
        }

        Ok(())
    }

    fn enqueue_watchers(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        for event in events {
            for &constraint_id in self.watch_lists.get_affected_constraints(domain, event) {
                if !self.constraints.is_active(constraint_id, &self.assignments)
                    || self.queue.is_constraint_enqueued(constraint_id)
                {
                    continue;
                }

                // Only the changes a constraint makes itself are covered by its idempotence;
                // changes made by direct subscribers it triggered are not.
                if self.options.respect_idempotence
                    && self.running.last() == Some(&constraint_id)
                    && self.constraints.is_idempotent(constraint_id)
                {
                    continue;
                }

                self.queue
                    .enqueue_constraint(constraint_id, self.constraints.priority(constraint_id));
                self.statistics.num_enqueues += 1;
            }
        }
    }

    fn propagate_to_fixed_point(&mut self) -> Result<(), Inconsistency> {
        while let Some(constraint_id) = self.queue.pop() {
            if !self.constraints.is_active(constraint_id, &self.assignments) {
                continue;
            }
            fdprop_assert_simple!(
                !self.constraints.is_in_flight(constraint_id),
                "The fixed point loop is not reentrant."
            );

            let mut constraint = self
                .constraints
                .take(constraint_id)
                .expect("a constraint which is not in flight is in its slot");
            self.statistics.num_propagate_calls += 1;

            trace!("Propagating {} ({constraint_id})", constraint.name());
            self.running.push(constraint_id);
            let status = constraint.propagate(PropagationContext::new(self));
            let _ = self.running.pop();

            self.constraints.put_back(constraint_id, constraint);
            self.handle_status(constraint_id, status)?;
        }

        Ok(())
    }

    fn handle_status(
        &mut self,
        constraint_id: ConstraintId,
        status: PropagationStatus,
    ) -> Result<(), Inconsistency> {
        match status {
            Ok(Outcome::Suspend) => Ok(()),
            Ok(Outcome::Success) => {
                trace!("{} is entailed", self.constraints.name(constraint_id));
                let active = self.constraints.active_cell(constraint_id);
                self.assignments.write_trailed_integer(active, 0);
                Ok(())
            }
            Err(inconsistency) => {
                trace!(
                    "{} failed: {inconsistency:?}",
                    self.constraints.name(constraint_id)
                );
                Err(self.fail(inconsistency))
            }
        }
    }

    /// Marks the store as failed at the current checkpoint.
    fn fail(&mut self, inconsistency: Inconsistency) -> Inconsistency {
        if self.failed_at.is_none() {
            self.failed_at = Some(self.get_checkpoint());
            self.statistics.num_failures += 1;

            debug!("Failure at choice point {}", self.get_checkpoint());
        }

        inconsistency
    }
}

// Statistics.
impl Store {
    /// Logs the statistics of the store followed by those of every posted constraint.
    pub fn log_statistics(&self) {
        if !should_log_statistics() {
            return;
        }

        log_statistic("variables", self.num_variables());
        log_statistic("constraints", self.num_constraints());
        self.statistics.log(StatisticLogger::new("store"));

        for (index, constraint) in self.constraints.iter_constraints().enumerate() {
            constraint.log_statistics(
                StatisticLogger::new(constraint.name()).attach_to_prefix(format!("number_{index}")),
            );
        }

        log_statistic_postfix();
    }
}
