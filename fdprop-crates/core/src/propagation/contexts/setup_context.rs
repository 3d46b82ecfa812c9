use std::ops::Deref;
use std::ops::DerefMut;

use enumset::EnumSet;

use super::PropagationContext;
use crate::engine::notifications::DirectEventKind;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::variables::IntegerVariable;
use crate::engine::Store;
use crate::engine::TrailedInteger;
use crate::propagation::ConstraintId;
use crate::propagation::LocalId;
use crate::propagation::Priority;

/// The context passed to [`Constraint::setup`](crate::propagation::Constraint::setup).
///
/// On top of everything a [`PropagationContext`] offers, it allows the constraint to subscribe to
/// events and to allocate reversible integers.
///
/// The `call_propagate_when_*` methods enqueue the constraint for propagation when the event
/// happens. The other `call_*` methods deliver the event synchronously to
/// [`Constraint::notify`](crate::propagation::Constraint::notify), together with `local_id`;
/// subscriptions with a more urgent `priority` are notified first.
#[derive(Debug)]
pub struct SetupContext<'a> {
    context: PropagationContext<'a>,
    constraint_id: ConstraintId,
}

impl<'a> SetupContext<'a> {
    pub(crate) fn new(store: &'a mut Store, constraint_id: ConstraintId) -> Self {
        SetupContext {
            context: PropagationContext::new(store),
            constraint_id,
        }
    }

    /// The id under which the constraint is posted.
    pub fn constraint_id(&self) -> ConstraintId {
        self.constraint_id
    }

    pub fn into_propagation_context(self) -> PropagationContext<'a> {
        self.context
    }

    /// Creates a reversible integer with the given value.
    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.context
            .store
            .assignments_mut()
            .new_trailed_integer(initial_value)
    }

    /// Enqueue the constraint whenever one of `events` happens on `var`.
    pub fn register<Var: IntegerVariable>(&mut self, var: &Var, events: EnumSet<DomainEvent>) {
        let mut watchers = Watchers::new(self.constraint_id, self.context.store.watch_lists_mut());
        var.watch_all(&mut watchers, events);
    }

    /// Notify the constraint synchronously whenever one of `kinds` happens on `var`.
    pub fn register_direct<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        kinds: EnumSet<DirectEventKind>,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        let mut watchers = Watchers::new(self.constraint_id, self.context.store.watch_lists_mut());
        var.watch_direct(&mut watchers, kinds, local_id, priority);
    }

    pub fn call_propagate_when_min<Var: IntegerVariable>(&mut self, var: &Var) {
        self.register(var, DomainEvent::LowerBound.into());
    }

    pub fn call_propagate_when_max<Var: IntegerVariable>(&mut self, var: &Var) {
        self.register(var, DomainEvent::UpperBound.into());
    }

    pub fn call_propagate_when_bounds<Var: IntegerVariable>(&mut self, var: &Var) {
        self.register(var, DomainEvent::Bounds.into());
    }

    pub fn call_propagate_when_bind<Var: IntegerVariable>(&mut self, var: &Var) {
        self.register(var, DomainEvent::Assign.into());
    }

    pub fn call_propagate_when_domain<Var: IntegerVariable>(&mut self, var: &Var) {
        self.register(var, DomainEvent::Any.into());
    }

    pub fn call_value_bind<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        self.register_direct(var, DirectEventKind::Assign.into(), local_id, priority);
    }

    pub fn call_value_remove<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        self.register_direct(var, DirectEventKind::Removal.into(), local_id, priority);
    }

    pub fn call_update_min<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        self.register_direct(var, DirectEventKind::LowerBound.into(), local_id, priority);
    }

    pub fn call_update_max<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        self.register_direct(var, DirectEventKind::UpperBound.into(), local_id, priority);
    }

    pub fn call_update_bounds<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        self.register_direct(var, DirectEventKind::Bounds.into(), local_id, priority);
    }
}

impl<'a> Deref for SetupContext<'a> {
    type Target = PropagationContext<'a>;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

impl DerefMut for SetupContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.context
    }
}
