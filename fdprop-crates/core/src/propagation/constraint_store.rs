use std::marker::PhantomData;

use super::Constraint;
use super::ConstraintId;
use super::Priority;
use crate::containers::KeyedVec;
use crate::engine::Assignments;
use crate::engine::TrailedInteger;
use crate::fdprop_asserts::fdprop_assert_simple;

/// The arena which owns every posted constraint.
///
/// A constraint is taken out of its slot while one of its methods runs; an empty slot therefore
/// means the constraint is in flight and must not be invoked again.
#[derive(Default)]
pub(crate) struct ConstraintStore {
    slots: KeyedVec<ConstraintId, ConstraintSlot>,
}

struct ConstraintSlot {
    constraint: Option<Box<dyn Constraint>>,
    name: String,
    priority: Priority,
    idempotent: bool,
    /// 1 while the constraint takes part in propagation, 0 once it is entailed or removed by
    /// restoring to before it was posted.
    active: TrailedInteger,
}

impl ConstraintStore {
    /// Adds the constraint in the in-flight state; it has to be returned with
    /// [`ConstraintStore::put_back`] once its setup finished.
    pub(crate) fn alloc(
        &mut self,
        constraint: &dyn Constraint,
        active: TrailedInteger,
    ) -> ConstraintId {
        self.slots.push(ConstraintSlot {
            constraint: None,
            name: constraint.name().to_owned(),
            priority: constraint.priority(),
            idempotent: constraint.idempotent(),
            active,
        })
    }

    pub(crate) fn num_constraints(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn take(&mut self, constraint_id: ConstraintId) -> Option<Box<dyn Constraint>> {
        self.slots[constraint_id].constraint.take()
    }

    pub(crate) fn put_back(
        &mut self,
        constraint_id: ConstraintId,
        constraint: Box<dyn Constraint>,
    ) {
        let slot = &mut self.slots[constraint_id].constraint;
        fdprop_assert_simple!(slot.is_none(), "a constraint slot was filled twice");
        *slot = Some(constraint);
    }

    pub(crate) fn is_in_flight(&self, constraint_id: ConstraintId) -> bool {
        self.slots[constraint_id].constraint.is_none()
    }

    pub(crate) fn is_active(&self, constraint_id: ConstraintId, assignments: &Assignments) -> bool {
        assignments.read_trailed_integer(self.slots[constraint_id].active) == 1
    }

    pub(crate) fn active_cell(&self, constraint_id: ConstraintId) -> TrailedInteger {
        self.slots[constraint_id].active
    }

    pub(crate) fn priority(&self, constraint_id: ConstraintId) -> Priority {
        self.slots[constraint_id].priority
    }

    pub(crate) fn is_idempotent(&self, constraint_id: ConstraintId) -> bool {
        self.slots[constraint_id].idempotent
    }

    pub(crate) fn name(&self, constraint_id: ConstraintId) -> &str {
        &self.slots[constraint_id].name
    }

    pub(crate) fn get(&self, constraint_id: ConstraintId) -> Option<&dyn Constraint> {
        self.slots
            .get(constraint_id)
            .and_then(|slot| slot.constraint.as_deref())
    }

    pub(crate) fn iter_constraints(&self) -> impl Iterator<Item = &dyn Constraint> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.constraint.as_deref())
    }
}

impl std::fmt::Debug for ConstraintStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| &slot.name))
            .finish()
    }
}

/// A typed handle to a constraint posted on the [`Store`](crate::Store).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ConstraintHandle<C> {
    id: ConstraintId,
    constraint: PhantomData<C>,
}

impl<C> ConstraintHandle<C> {
    pub(crate) fn new(id: ConstraintId) -> Self {
        ConstraintHandle {
            id,
            constraint: PhantomData,
        }
    }

    /// The untyped id of the constraint.
    pub fn id(&self) -> ConstraintId {
        self.id
    }
}

impl<C> Clone for ConstraintHandle<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ConstraintHandle<C> {}
