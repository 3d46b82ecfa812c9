use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::notifications::DirectEvent;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::EventSource;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Removes the value of every fixed variable from the domains of the other variables.
///
/// Bindings are received directly, so the value disappears from the other domains before the
/// binding is reported to any enqueued constraint. Bindings which happen while the propagator is
/// running are handled by [`Constraint::propagate`].
#[derive(Clone, Debug)]
pub(crate) struct AllDifferentForwardChecking<Var> {
    variables: Box<[Var]>,
    /// Variables which became fixed and whose value still has to be removed from the others.
    pending: Vec<usize>,
}

impl<Var: IntegerVariable> AllDifferentForwardChecking<Var> {
    pub(crate) fn new(variables: Box<[Var]>) -> Self {
        AllDifferentForwardChecking {
            variables,
            pending: Vec::new(),
        }
    }

    /// Removes the values of the pending variables from the other variables, including the values
    /// of variables which become fixed along the way.
    fn remove_pending_values(
        &mut self,
        context: &mut PropagationContext<'_>,
    ) -> PropagationStatus {
        while let Some(fixed) = self.pending.pop() {
            let value = context.lower_bound(&self.variables[fixed]);

            for (index, other) in self.variables.iter().enumerate() {
                if index == fixed || !context.contains(other, value) {
                    continue;
                }

                context.remove(other, value)?;

                if context.is_fixed(other) {
                    self.pending.push(index);
                }
            }
        }

        Ok(Outcome::Suspend)
    }
}

impl<Var: IntegerVariable + 'static> Constraint for AllDifferentForwardChecking<Var> {
    fn name(&self) -> &str {
        "AllDifferentForwardChecking"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn idempotent(&self) -> bool {
        true
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        _: PropagationStrength,
    ) -> PropagationStatus {
        for (index, var) in self.variables.iter().enumerate() {
            context.call_value_bind(var, Some(LocalId::from(index as u32)), Priority::High);
            context.call_propagate_when_bind(var);
        }

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        self.pending.clear();
        self.pending.extend(
            self.variables
                .iter()
                .enumerate()
                .filter(|(_, var)| context.is_fixed(*var))
                .map(|(index, _)| index),
        );

        self.remove_pending_values(&mut context)
    }

    fn notify(
        &mut self,
        mut context: PropagationContext<'_>,
        source: EventSource,
        _: DirectEvent,
    ) -> PropagationStatus {
        let local_id = source
            .local_id
            .expect("every subscription is registered with its index");

        self.pending.clear();
        self.pending.push(local_id.unpack() as usize);

        self.remove_pending_values(&mut context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Inconsistency;
    use crate::Store;

    #[test]
    fn fixed_value_is_removed_from_the_others() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 1);
        let y = store.new_interval_variable(1, 3);
        let z = store.new_interval_variable(1, 3);

        let _ = store
            .post(
                AllDifferentForwardChecking::new([x, y, z].into()),
                PropagationStrength::Weak,
            )
            .expect("no failure");

        assert!(!store.contains(&y, 1));
        assert!(!store.contains(&z, 1));
    }

    #[test]
    fn bindings_cascade() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 3);
        let y = store.new_interval_variable(1, 2);
        let z = store.new_interval_variable(1, 3);

        let _ = store
            .post(
                AllDifferentForwardChecking::new([x, y, z].into()),
                PropagationStrength::Weak,
            )
            .expect("no failure");

        store.assign(&x, 1).expect("no failure");

        assert_eq!(Some(2), store.fixed_value(&y));
        assert_eq!(Some(3), store.fixed_value(&z));
    }

    #[test]
    fn cascading_bindings_detect_failure() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 2);
        let z = store.new_interval_variable(1, 2);

        let _ = store
            .post(
                AllDifferentForwardChecking::new([x, y, z].into()),
                PropagationStrength::Weak,
            )
            .expect("no failure");

        assert_eq!(Err(Inconsistency::EmptyDomain), store.assign(&x, 1));
        assert!(store.is_failed());
    }
}
