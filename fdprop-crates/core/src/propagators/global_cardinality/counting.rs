use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Counts, for every listed value, the variables fixed to it and the variables which can still
/// take it.
///
/// Too many fixed or too few possible occurrences is a failure. A value with as many fixed
/// occurrences as its maximum is removed from the other variables, and a value with as many
/// possible occurrences as its minimum is assigned to every variable which can take it.
#[derive(Clone, Debug)]
pub(crate) struct GlobalCardinalityCounting<Var> {
    variables: Box<[Var]>,
    values: Box<[i32]>,
    min_counts: Box<[u32]>,
    max_counts: Box<[u32]>,
}

impl<Var: IntegerVariable> GlobalCardinalityCounting<Var> {
    pub(crate) fn new(
        variables: Box<[Var]>,
        values: Box<[i32]>,
        min_counts: Box<[u32]>,
        max_counts: Box<[u32]>,
    ) -> Self {
        GlobalCardinalityCounting {
            variables,
            values,
            min_counts,
            max_counts,
        }
    }

    /// Returns `true` if a domain was changed.
    fn filter_value(
        &self,
        context: &mut PropagationContext<'_>,
        index: usize,
    ) -> Result<bool, Inconsistency> {
        let value = self.values[index];

        let mut bound = 0;
        let mut possible = 0;
        for var in self.variables.iter() {
            if context.contains(var, value) {
                possible += 1;
                if context.is_fixed(var) {
                    bound += 1;
                }
            }
        }

        if bound > self.max_counts[index] || possible < self.min_counts[index] {
            return Err(Inconsistency::Conflict);
        }
        if bound == possible {
            return Ok(false);
        }

        if bound == self.max_counts[index] {
            for var in self.variables.iter() {
                if !context.is_fixed(var) {
                    context.remove(var, value)?;
                }
            }
            Ok(true)
        } else if possible == self.min_counts[index] {
            for var in self.variables.iter() {
                if context.contains(var, value) {
                    context.assign(var, value)?;
                }
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for GlobalCardinalityCounting<Var> {
    fn name(&self) -> &str {
        "GlobalCardinalityCounting"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn idempotent(&self) -> bool {
        true
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        _: PropagationStrength,
    ) -> PropagationStatus {
        for var in self.variables.iter() {
            context.call_propagate_when_domain(var);
        }

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        // Fixing or removing a value changes the counts of the other values.
        loop {
            let mut changed = false;
            for index in 0..self.values.len() {
                changed |= self.filter_value(&mut context, index)?;
            }

            if !changed {
                break;
            }
        }

        if self.variables.iter().all(|var| context.is_fixed(var)) {
            return Ok(Outcome::Success);
        }

        Ok(Outcome::Suspend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::DomainId;
    use crate::Store;

    fn counting(
        variables: &[DomainId],
        values: &[i32],
        min_counts: &[u32],
        max_counts: &[u32],
    ) -> GlobalCardinalityCounting<DomainId> {
        GlobalCardinalityCounting::new(
            variables.into(),
            values.into(),
            min_counts.into(),
            max_counts.into(),
        )
    }

    #[test]
    fn saturated_value_is_removed_from_the_others() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 1);
        let y = store.new_interval_variable(1, 3);
        let z = store.new_interval_variable(1, 3);

        let _ = store
            .post(counting(&[x, y, z], &[1], &[0], &[1]), PropagationStrength::Weak)
            .expect("no failure");

        assert!(!store.contains(&y, 1));
        assert!(!store.contains(&z, 1));
    }

    #[test]
    fn value_with_just_enough_candidates_is_assigned() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 3);
        let y = store.new_interval_variable(1, 3);
        let z = store.new_interval_variable(3, 4);

        let _ = store
            .post(counting(&[x, y, z], &[1], &[2], &[3]), PropagationStrength::Weak)
            .expect("no failure");

        assert_eq!(Some(1), store.fixed_value(&x));
        assert_eq!(Some(1), store.fixed_value(&y));
        assert_eq!(2, store.size(&z));
    }

    #[test]
    fn too_few_candidates_fail() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 3);
        let y = store.new_interval_variable(2, 3);

        let result = store.post(counting(&[x, y], &[1], &[2], &[2]), PropagationStrength::Weak);

        assert!(result.is_err());
    }

    #[test]
    fn binding_saturates_a_value_later() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 2);

        let _ = store
            .post(counting(&[x, y], &[2], &[0], &[1]), PropagationStrength::Weak)
            .expect("no failure");

        store.push_state();
        store.assign(&x, 2).expect("non-empty");
        store.propagate().expect("no failure");
        assert_eq!(Some(1), store.fixed_value(&y));

        store.pop();
        assert_eq!(2, store.size(&y));
    }
}
