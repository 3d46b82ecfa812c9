use enumset::EnumSet;

use crate::basic_types::Inconsistency;
use crate::containers::StorageKey;
use crate::engine::notifications::DirectEventKind;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::variables::AffineView;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::TransformableVariable;
use crate::engine::Assignments;
use crate::engine::Store;
use crate::propagation::LocalId;
use crate::propagation::Priority;

/// A structure which represents the most basic [`IntegerVariable`]; it is simply the id which
/// links to a domain (hence the name).
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct DomainId {
    id: u32,
}

impl DomainId {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl IntegerVariable for DomainId {
    type AffineView = AffineView<Self>;

    fn lower_bound(&self, assignments: &Assignments) -> i32 {
        assignments.get_lower_bound(*self)
    }

    fn upper_bound(&self, assignments: &Assignments) -> i32 {
        assignments.get_upper_bound(*self)
    }

    fn size(&self, assignments: &Assignments) -> usize {
        assignments.get_size(*self)
    }

    fn contains(&self, assignments: &Assignments, value: i32) -> bool {
        assignments.is_value_in_domain(*self, value)
    }

    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        assignments.get_next_value(*self, value)
    }

    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        assignments.get_previous_value(*self, value)
    }

    fn iterate_domain<'a>(
        &'a self,
        assignments: &'a Assignments,
    ) -> impl Iterator<Item = i32> + 'a {
        assignments.get_domain_iterator(*self)
    }

    fn remove(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        store.remove_value_from_domain(*self, value)
    }

    fn set_lower_bound(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        store.tighten_lower_bound(*self, value)
    }

    fn set_upper_bound(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        store.tighten_upper_bound(*self, value)
    }

    fn assign(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        store.make_assignment(*self, value)
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        watchers.watch_all(*self, events);
    }

    fn watch_direct(
        &self,
        watchers: &mut Watchers<'_>,
        kinds: EnumSet<DirectEventKind>,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        watchers.watch_direct(*self, kinds, local_id, priority);
    }
}

impl TransformableVariable<AffineView<DomainId>> for DomainId {
    fn scaled(&self, scale: i32) -> AffineView<DomainId> {
        AffineView::new(*self, scale, 0)
    }

    fn offset(&self, offset: i32) -> AffineView<DomainId> {
        AffineView::new(*self, 1, offset)
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl std::fmt::Debug for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
