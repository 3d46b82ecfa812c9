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

/// Propagator for the constraint `a != b`.
#[derive(Clone, Debug)]
pub(crate) struct BinaryNotEqualsPropagator<AVar, BVar> {
    a: AVar,
    b: BVar,
}

impl<AVar, BVar> BinaryNotEqualsPropagator<AVar, BVar> {
    pub(crate) fn new(a: AVar, b: BVar) -> Self {
        BinaryNotEqualsPropagator { a, b }
    }
}

impl<AVar, BVar> Constraint for BinaryNotEqualsPropagator<AVar, BVar>
where
    AVar: IntegerVariable + 'static,
    BVar: IntegerVariable + 'static,
{
    fn name(&self) -> &str {
        "BinaryNotEq"
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
        // We only care about the case where one of the two is assigned
        context.call_propagate_when_bind(&self.a);
        context.call_propagate_when_bind(&self.b);

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        let a_lb = context.lower_bound(&self.a);
        let a_ub = context.upper_bound(&self.a);

        let b_lb = context.lower_bound(&self.b);
        let b_ub = context.upper_bound(&self.b);

        if a_ub < b_lb || b_ub < a_lb {
            // The domains are non-overlapping
            return Ok(Outcome::Success);
        }

        if a_lb == a_ub && b_lb == b_ub {
            // Overlapping fixed domains hold the same value.
            return Err(Inconsistency::Conflict);
        }

        if a_lb == a_ub {
            context.remove(&self.b, a_lb)?;
            return Ok(Outcome::Success);
        }

        if b_lb == b_ub {
            context.remove(&self.a, b_lb)?;
            return Ok(Outcome::Success);
        }

        Ok(Outcome::Suspend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::TransformableVariable;
    use crate::Store;

    #[test]
    fn binding_one_side_removes_the_value_from_the_other() {
        let mut store = Store::default();
        let a = store.new_interval_variable(1, 3);
        let b = store.new_interval_variable(1, 3);

        let handle = store
            .post(
                BinaryNotEqualsPropagator::new(a, b),
                PropagationStrength::Weak,
            )
            .expect("no failure");
        assert!(store.is_active(handle));

        store.assign(&b, 3).expect("3 is in the domain");
        store.propagate().expect("no failure");

        assert_eq!(2, store.upper_bound(&a));
        assert!(!store.is_active(handle));
    }

    #[test]
    fn disjoint_domains_entail_the_constraint() {
        let mut store = Store::default();
        let a = store.new_interval_variable(1, 3);
        let b = store.new_interval_variable(4, 6);

        let handle = store
            .post(
                BinaryNotEqualsPropagator::new(a, b),
                PropagationStrength::Weak,
            )
            .expect("no failure");

        assert!(!store.is_active(handle));
    }

    #[test]
    fn equal_fixed_values_fail() {
        let mut store = Store::default();
        let a = store.new_interval_variable(2, 2);
        let b = store.new_interval_variable(1, 1);

        let result = store.post(
            BinaryNotEqualsPropagator::new(a, b.offset(1)),
            PropagationStrength::Weak,
        );

        assert!(result.is_err());
    }
}
