use std::fmt::Display;

use enum_map::Enum;
use enumset::EnumSet;
use enumset::EnumSetType;

/// A change to a domain which enqueues the subscribed constraints for propagation.
#[derive(Debug, EnumSetType, Enum, Hash)]
pub enum DomainEvent {
    /// The domain became a single value.
    Assign,
    /// The lower bound increased.
    LowerBound,
    /// The upper bound decreased.
    UpperBound,
    /// Either bound changed.
    Bounds,
    /// Any value was removed.
    Any,
}

impl DomainEvent {
    /// The event as seen through a view which negates the domain.
    pub(crate) fn negated(self) -> DomainEvent {
        match self {
            DomainEvent::LowerBound => DomainEvent::UpperBound,
            DomainEvent::UpperBound => DomainEvent::LowerBound,
            event => event,
        }
    }

    pub(crate) fn negate_all(events: EnumSet<DomainEvent>) -> EnumSet<DomainEvent> {
        events.iter().map(DomainEvent::negated).collect()
    }
}

impl Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainEvent::Assign => write!(f, "[Event:Assign]"),
            DomainEvent::LowerBound => write!(f, "[Event:LB]"),
            DomainEvent::UpperBound => write!(f, "[Event:UB]"),
            DomainEvent::Bounds => write!(f, "[Event:Bounds]"),
            DomainEvent::Any => write!(f, "[Event:Any]"),
        }
    }
}

/// A change to a domain which is delivered synchronously to the subscribed constraints.
#[derive(Debug, EnumSetType, Enum, Hash)]
pub enum DirectEventKind {
    /// The domain became a single value. Delivered as [`DirectEvent::Assigned`].
    Assign,
    /// A value is about to be removed. Delivered as [`DirectEvent::Removed`] while the value is
    /// still in the domain.
    Removal,
    /// Delivered as [`DirectEvent::LowerBound`].
    LowerBound,
    /// Delivered as [`DirectEvent::UpperBound`].
    UpperBound,
    /// Delivered as [`DirectEvent::Bounds`].
    Bounds,
}

impl DirectEventKind {
    pub(crate) fn negated(self) -> DirectEventKind {
        match self {
            DirectEventKind::LowerBound => DirectEventKind::UpperBound,
            DirectEventKind::UpperBound => DirectEventKind::LowerBound,
            kind => kind,
        }
    }

    pub(crate) fn negate_all(kinds: EnumSet<DirectEventKind>) -> EnumSet<DirectEventKind> {
        kinds.iter().map(DirectEventKind::negated).collect()
    }
}

/// The payload of a direct notification, expressed in the coordinates of the variable the
/// constraint subscribed through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectEvent {
    Assigned(i32),
    Removed(i32),
    LowerBound { old: i32 },
    UpperBound { old: i32 },
    Bounds { old_lower_bound: i32, old_upper_bound: i32 },
}

impl DirectEvent {
    pub fn kind(&self) -> DirectEventKind {
        match self {
            DirectEvent::Assigned(_) => DirectEventKind::Assign,
            DirectEvent::Removed(_) => DirectEventKind::Removal,
            DirectEvent::LowerBound { .. } => DirectEventKind::LowerBound,
            DirectEvent::UpperBound { .. } => DirectEventKind::UpperBound,
            DirectEvent::Bounds { .. } => DirectEventKind::Bounds,
        }
    }
}

impl Display for DirectEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectEvent::Assigned(value) => write!(f, "[Direct:Assigned {value}]"),
            DirectEvent::Removed(value) => write!(f, "[Direct:Removed {value}]"),
            DirectEvent::LowerBound { old } => write!(f, "[Direct:LB from {old}]"),
            DirectEvent::UpperBound { old } => write!(f, "[Direct:UB from {old}]"),
            DirectEvent::Bounds {
                old_lower_bound,
                old_upper_bound,
            } => write!(f, "[Direct:Bounds from {old_lower_bound}..{old_upper_bound}]"),
        }
    }
}
