use std::cmp::Ordering;

use enumset::EnumSet;

use super::TransformableVariable;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Inconsistency;
use crate::engine::notifications::DirectEventKind;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::Watchers;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::Assignments;
use crate::engine::Store;
use crate::math::num_ext::NumExt;
use crate::propagation::LocalId;
use crate::propagation::Priority;

/// Models the constraint `y = ax + b`, by expressing the domain of `y` as a transformation of the
/// domain of `x`.
///
/// Queries, changes and subscriptions are forwarded to `x`. Values of `y` which are not the
/// image of an integer are never in the domain of `y`.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct AffineView<Inner> {
    inner: Inner,
    scale: i32,
    offset: i32,
}

impl<Inner> AffineView<Inner> {
    pub fn new(inner: Inner, scale: i32, offset: i32) -> Self {
        assert_ne!(scale, 0, "Multiplication by zero is not invertable");
        AffineView {
            inner,
            scale,
            offset,
        }
    }

    /// Apply the inverse transformation of this view on a value, to go from the value in the domain
    /// of `self` to a value in the domain of `self.inner`.
    fn invert(&self, value: i32, rounding: Rounding) -> i32 {
        let inverted_translation = value - self.offset;

        match rounding {
            Rounding::Up => <i32 as NumExt>::div_ceil(inverted_translation, self.scale),
            Rounding::Down => <i32 as NumExt>::div_floor(inverted_translation, self.scale),
        }
    }

    /// The value of `self.inner` which maps onto `value`, if there is one.
    fn invert_exactly(&self, value: i32) -> Option<i32> {
        ((value - self.offset) % self.scale == 0).then(|| (value - self.offset) / self.scale)
    }

    fn map(&self, value: i32) -> i32 {
        self.scale * value + self.offset
    }
}

impl<View> IntegerVariable for AffineView<View>
where
    View: IntegerVariable,
{
    type AffineView = Self;

    fn lower_bound(&self, assignments: &Assignments) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.upper_bound(assignments))
        } else {
            self.map(self.inner.lower_bound(assignments))
        }
    }

    fn upper_bound(&self, assignments: &Assignments) -> i32 {
        if self.scale < 0 {
            self.map(self.inner.lower_bound(assignments))
        } else {
            self.map(self.inner.upper_bound(assignments))
        }
    }

    fn size(&self, assignments: &Assignments) -> usize {
        self.inner.size(assignments)
    }

    fn contains(&self, assignments: &Assignments, value: i32) -> bool {
        self.invert_exactly(value)
            .is_some_and(|inverted| self.inner.contains(assignments, inverted))
    }

    fn next_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        if self.scale < 0 {
            self.inner
                .previous_value(assignments, self.invert(value, Rounding::Up))
                .map(|inner| self.map(inner))
        } else {
            self.inner
                .next_value(assignments, self.invert(value, Rounding::Down))
                .map(|inner| self.map(inner))
        }
    }

    fn previous_value(&self, assignments: &Assignments, value: i32) -> Option<i32> {
        if self.scale < 0 {
            self.inner
                .next_value(assignments, self.invert(value, Rounding::Down))
                .map(|inner| self.map(inner))
        } else {
            self.inner
                .previous_value(assignments, self.invert(value, Rounding::Up))
                .map(|inner| self.map(inner))
        }
    }

    fn remove(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        match self.invert_exactly(value) {
            Some(inverted) => self.inner.remove(store, inverted),
            None => Ok(()),
        }
    }

    fn set_lower_bound(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        if self.scale < 0 {
            self.inner
                .set_upper_bound(store, self.invert(value, Rounding::Down))
        } else {
            self.inner
                .set_lower_bound(store, self.invert(value, Rounding::Up))
        }
    }

    fn set_upper_bound(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        if self.scale < 0 {
            self.inner
                .set_lower_bound(store, self.invert(value, Rounding::Up))
        } else {
            self.inner
                .set_upper_bound(store, self.invert(value, Rounding::Down))
        }
    }

    fn assign(&self, store: &mut Store, value: i32) -> Result<(), Inconsistency> {
        match self.invert_exactly(value) {
            Some(inverted) => self.inner.assign(store, inverted),
            None => Err(EmptyDomain.into()),
        }
    }

    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        let events = if self.scale < 0 {
            DomainEvent::negate_all(events)
        } else {
            events
        };
        self.inner
            .watch_all(&mut watchers.through_view(self.scale, self.offset), events);
    }

    fn watch_direct(
        &self,
        watchers: &mut Watchers<'_>,
        kinds: EnumSet<DirectEventKind>,
        local_id: Option<LocalId>,
        priority: Priority,
    ) {
        let kinds = if self.scale < 0 {
            DirectEventKind::negate_all(kinds)
        } else {
            kinds
        };
        self.inner.watch_direct(
            &mut watchers.through_view(self.scale, self.offset),
            kinds,
            local_id,
            priority,
        );
    }
}

impl<View> TransformableVariable<AffineView<View>> for AffineView<View>
where
    View: IntegerVariable,
{
    fn scaled(&self, scale: i32) -> AffineView<View> {
        AffineView::new(self.inner.clone(), self.scale * scale, self.offset * scale)
    }

    fn offset(&self, offset: i32) -> AffineView<View> {
        AffineView::new(self.inner.clone(), self.scale, self.offset + offset)
    }
}

impl<Var: std::fmt::Debug> std::fmt::Debug for AffineView<Var> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scale == -1 {
            write!(f, "-")?;
        } else if self.scale != 1 {
            write!(f, "{} * ", self.scale)?;
        }

        write!(f, "({:?})", self.inner)?;

        match self.offset.cmp(&0) {
            Ordering::Less => write!(f, " - {}", -self.offset)?,
            Ordering::Equal => {}
            Ordering::Greater => write!(f, " + {}", self.offset)?,
        }

        Ok(())
    }
}

impl From<DomainId> for AffineView<DomainId> {
    fn from(value: DomainId) -> Self {
        AffineView::new(value, 1, 0)
    }
}

enum Rounding {
    Up,
    Down,
}
