use enum_map::EnumMap;
use enumset::EnumSet;

use super::DirectEvent;
use super::DirectEventKind;
use super::DomainEvent;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::propagation::ConstraintId;
use crate::propagation::LocalId;
use crate::propagation::Priority;

/// The subscriptions of all constraints, per domain.
#[derive(Default, Debug)]
pub(crate) struct WatchLists {
    watchers: KeyedVec<DomainId, WatcherDomainEvents>,
}

#[derive(Default, Debug)]
struct WatcherDomainEvents {
    propagate_watchers: EnumMap<DomainEvent, Vec<ConstraintId>>,
    /// Kept sorted by priority, most urgent first.
    direct_watchers: EnumMap<DirectEventKind, Vec<DirectWatch>>,
}

/// A subscription of a constraint to direct events of a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DirectWatch {
    pub(crate) constraint: ConstraintId,
    pub(crate) local_id: Option<LocalId>,
    /// Maps values of the domain to values of the variable the constraint subscribed through.
    pub(crate) transform: ViewTransform,
    pub(crate) priority: Priority,
}

/// The affine map `value * scale + offset` from a domain to a view on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ViewTransform {
    scale: i32,
    offset: i32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        ViewTransform {
            scale: 1,
            offset: 0,
        }
    }
}

impl ViewTransform {
    /// The transform which first applies `scale` and `offset` and then `self`.
    fn compose(self, scale: i32, offset: i32) -> ViewTransform {
        ViewTransform {
            scale: self.scale * scale,
            offset: self.scale * offset + self.offset,
        }
    }

    fn map(self, value: i32) -> i32 {
        self.scale * value + self.offset
    }

    /// Expresses an event on the domain in terms of the view. Under a negating transform the
    /// bounds swap roles.
    pub(crate) fn map_event(self, event: DirectEvent) -> DirectEvent {
        match event {
            DirectEvent::Assigned(value) => DirectEvent::Assigned(self.map(value)),
            DirectEvent::Removed(value) => DirectEvent::Removed(self.map(value)),
            DirectEvent::LowerBound { old } if self.scale < 0 => DirectEvent::UpperBound {
                old: self.map(old),
            },
            DirectEvent::LowerBound { old } => DirectEvent::LowerBound {
                old: self.map(old),
            },
            DirectEvent::UpperBound { old } if self.scale < 0 => DirectEvent::LowerBound {
                old: self.map(old),
            },
            DirectEvent::UpperBound { old } => DirectEvent::UpperBound {
                old: self.map(old),
            },
            DirectEvent::Bounds {
                old_lower_bound,
                old_upper_bound,
            } if self.scale < 0 => DirectEvent::Bounds {
                old_lower_bound: self.map(old_upper_bound),
                old_upper_bound: self.map(old_lower_bound),
            },
            DirectEvent::Bounds {
                old_lower_bound,
                old_upper_bound,
            } => DirectEvent::Bounds {
                old_lower_bound: self.map(old_lower_bound),
                old_upper_bound: self.map(old_upper_bound),
            },
        }
    }
}

impl WatchLists {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(WatcherDomainEvents::default());
    }

    pub(crate) fn watch_all(
        &mut self,
        domain: DomainId,
        events: EnumSet<DomainEvent>,
        constraint: ConstraintId,
    ) {
        let watcher = &mut self.watchers[domain];

        for event in events {
            let constraints = &mut watcher.propagate_watchers[event];
            if !constraints.contains(&constraint) {
                constraints.push(constraint);
            }
        }
    }

    pub(crate) fn watch_direct(
        &mut self,
        domain: DomainId,
        kinds: EnumSet<DirectEventKind>,
        watch: DirectWatch,
    ) {
        let watcher = &mut self.watchers[domain];

        for kind in kinds {
            let watches = &mut watcher.direct_watchers[kind];
            let position = watches.partition_point(|other| other.priority <= watch.priority);
            watches.insert(position, watch);
        }
    }

    pub(crate) fn get_affected_constraints(
        &self,
        domain: DomainId,
        event: DomainEvent,
    ) -> &[ConstraintId] {
        &self.watchers[domain].propagate_watchers[event]
    }

    pub(crate) fn get_direct_watchers(
        &self,
        domain: DomainId,
        kind: DirectEventKind,
    ) -> &[DirectWatch] {
        &self.watchers[domain].direct_watchers[kind]
    }
}

/// Used by variables to register a constraint for events on the domains they are built on.
#[derive(Debug)]
pub struct Watchers<'a> {
    constraint: ConstraintId,
    watch_lists: &'a mut WatchLists,
    transform: ViewTransform,
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(constraint: ConstraintId, watch_lists: &'a mut WatchLists) -> Self {
        Watchers {
            constraint,
            watch_lists,
            transform: ViewTransform::default(),
        }
    }

    /// Watchers for the inner variable of the view `inner * scale + offset`.
    pub(crate) fn through_view(&mut self, scale: i32, offset: i32) -> Watchers<'_> {
        Watchers {
            constraint: self.constraint,
            watch_lists: &mut *self.watch_lists,
            transform: self.transform.compose(scale, offset),
        }
    }

    pub(crate) fn watch_all(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        self.watch_lists.watch_all(domain, events, self.constraint);
    }

    pub(crate) fn watch_direct(
        &mut self,
        domain: DomainId,
        kinds: EnumSet<DirectEventKind>,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        self.watch_lists.watch_direct(
            domain,
            kinds,
            DirectWatch {
                constraint: self.constraint,
                local_id,
                transform: self.transform,
                priority,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn direct_watchers_are_sorted_by_priority() {
        let mut watch_lists = WatchLists::default();
        watch_lists.grow();
        let domain = DomainId::create_from_index(0);

        for (index, priority) in [Priority::Low, Priority::High, Priority::Low, Priority::Medium]
            .into_iter()
            .enumerate()
        {
            Watchers::new(ConstraintId::create_from_index(index), &mut watch_lists).watch_direct(
                domain,
                DirectEventKind::Assign.into(),
                None,
                priority,
            );
        }

        let order = watch_lists
            .get_direct_watchers(domain, DirectEventKind::Assign)
            .iter()
            .map(|watch| watch.constraint.index())
            .collect::<Vec<_>>();
        assert_eq!(vec![1, 3, 0, 2], order);
    }

    #[test]
    fn negating_transform_swaps_bound_events() {
        let mut watch_lists = WatchLists::default();
        let mut watchers = Watchers::new(ConstraintId::create_from_index(0), &mut watch_lists);
        let transform = watchers.through_view(-2, 1).transform;

        assert_eq!(
            DirectEvent::UpperBound { old: -5 },
            transform.map_event(DirectEvent::LowerBound { old: 3 })
        );
        assert_eq!(
            DirectEvent::Bounds {
                old_lower_bound: -19,
                old_upper_bound: 1
            },
            transform.map_event(DirectEvent::Bounds {
                old_lower_bound: 0,
                old_upper_bound: 10
            })
        );
    }

    #[test]
    fn nested_views_compose() {
        let mut watch_lists = WatchLists::default();
        let mut watchers = Watchers::new(ConstraintId::create_from_index(0), &mut watch_lists);
        // y = 3 * z + 1 where z = 2 * x + 5, so y = 6 * x + 16.
        let mut outer = watchers.through_view(3, 1);
        let inner = outer.through_view(2, 5);

        assert_eq!(
            ViewTransform {
                scale: 6,
                offset: 16
            },
            inner.transform
        );
    }

    #[test]
    fn registering_twice_for_an_event_keeps_one_entry() {
        let mut watch_lists = WatchLists::default();
        watch_lists.grow();
        let domain = DomainId::create_from_index(0);
        let constraint = ConstraintId::create_from_index(0);

        watch_lists.watch_all(domain, DomainEvent::Any | DomainEvent::Assign, constraint);
        watch_lists.watch_all(domain, DomainEvent::Any.into(), constraint);

        assert_eq!(
            &[constraint],
            watch_lists.get_affected_constraints(domain, DomainEvent::Any)
        );
    }
}
