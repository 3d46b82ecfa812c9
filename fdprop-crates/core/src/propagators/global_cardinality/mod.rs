//! Propagators for the global cardinality constraint: every listed value occurs between its
//! minimum and maximum number of times among the variables.
mod counting;
mod matching;

pub(crate) use counting::GlobalCardinalityCounting;
pub(crate) use matching::GlobalCardinalityMatching;

use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::PropagationContext;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Posts the counting propagator, and for [`PropagationStrength::Medium`] and stronger also the
/// matching based one.
#[derive(Clone, Debug)]
pub(crate) struct GlobalCardinality<Var> {
    variables: Box<[Var]>,
    values: Box<[i32]>,
    min_counts: Box<[u32]>,
    max_counts: Box<[u32]>,
}

impl<Var: IntegerVariable> GlobalCardinality<Var> {
    pub(crate) fn new(
        variables: Box<[Var]>,
        values: Box<[i32]>,
        min_counts: Box<[u32]>,
        max_counts: Box<[u32]>,
    ) -> Self {
        GlobalCardinality {
            variables,
            values,
            min_counts,
            max_counts,
        }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for GlobalCardinality<Var> {
    fn name(&self) -> &str {
        "GlobalCardinality"
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        strength: PropagationStrength,
    ) -> PropagationStatus {
        context.post(
            GlobalCardinalityCounting::new(
                self.variables.clone(),
                self.values.clone(),
                self.min_counts.clone(),
                self.max_counts.clone(),
            ),
            strength,
        )?;

        if strength >= PropagationStrength::Medium {
            context.post(
                GlobalCardinalityMatching::new(
                    self.variables.clone(),
                    &self.values,
                    &self.min_counts,
                    &self.max_counts,
                ),
                strength,
            )?;
        }

        Ok(Outcome::Success)
    }

    fn propagate(&mut self, _: PropagationContext<'_>) -> PropagationStatus {
        Ok(Outcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::ReadDomains;
    use crate::Store;

    fn global_cardinality(
        variables: &[crate::variables::DomainId],
    ) -> GlobalCardinality<crate::variables::DomainId> {
        // Values 1 and 2 both occur exactly once.
        GlobalCardinality::new(
            variables.into(),
            [1, 2].into(),
            [1, 1].into(),
            [1, 1].into(),
        )
    }

    #[test]
    fn weak_only_counts() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 2);
        let z = store.new_interval_variable(1, 3);

        let _ = store
            .post(global_cardinality(&[x, y, z]), PropagationStrength::Weak)
            .expect("no failure");

        assert_eq!(3, store.size(&z));
    }

    #[test]
    fn medium_uses_the_matching() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 2);
        let z = store.new_interval_variable(1, 3);

        let _ = store
            .post(global_cardinality(&[x, y, z]), PropagationStrength::Medium)
            .expect("no failure");

        assert_eq!(Some(3), store.fixed_value(&z));
    }
}
