//! Propagators for the constraint that the variables take at least `n` distinct values.
mod forward_checking;
mod matching;

pub(crate) use forward_checking::AtLeastNValueForwardChecking;
pub(crate) use matching::AtLeastNValueMatching;

use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::PropagationContext;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Posts the forward checking propagator, and for [`PropagationStrength::Medium`] and stronger
/// also the matching based one.
#[derive(Clone, Debug)]
pub(crate) struct AtLeastNValue<Var> {
    variables: Box<[Var]>,
    n: usize,
}

impl<Var: IntegerVariable> AtLeastNValue<Var> {
    pub(crate) fn new(variables: Box<[Var]>, n: usize) -> Self {
        AtLeastNValue { variables, n }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for AtLeastNValue<Var> {
    fn name(&self) -> &str {
        "AtLeastNValue"
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        strength: PropagationStrength,
    ) -> PropagationStatus {
        if self.n == 0 {
            return Ok(Outcome::Success);
        }

        context.post(
            AtLeastNValueForwardChecking::new(self.variables.clone(), self.n),
            strength,
        )?;

        if strength >= PropagationStrength::Medium {
            context.post(
                AtLeastNValueMatching::new(self.variables.clone(), self.n),
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

    #[test]
    fn zero_values_posts_nothing() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 1);

        let _ = store
            .post(AtLeastNValue::new([x].into(), 0), PropagationStrength::Strong)
            .expect("no failure");

        assert_eq!(1, store.num_constraints());
    }

    fn post(store: &mut Store, strength: PropagationStrength) -> crate::variables::DomainId {
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 2);
        let z = store.new_interval_variable(1, 2);
        let w = store.new_interval_variable(1, 3);

        // Only w can take the third value.
        let _ = store
            .post(AtLeastNValue::new([x, y, z, w].into(), 3), strength)
            .expect("no failure");

        w
    }

    #[test]
    fn weak_only_counts_the_candidates() {
        let mut store = Store::default();
        let w = post(&mut store, PropagationStrength::Weak);

        assert_eq!(3, store.size(&w));
    }

    #[test]
    fn medium_prunes_with_the_matching() {
        let mut store = Store::default();
        let w = post(&mut store, PropagationStrength::Medium);

        assert_eq!(Some(3), store.fixed_value(&w));
    }
}
