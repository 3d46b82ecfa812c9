use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Propagator for the constraint `x != value`.
#[derive(Clone, Debug)]
pub(crate) struct NotEqualConstantPropagator<Var> {
    x: Var,
    value: i32,
}

impl<Var: IntegerVariable> NotEqualConstantPropagator<Var> {
    pub(crate) fn new(x: Var, value: i32) -> Self {
        NotEqualConstantPropagator { x, value }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for NotEqualConstantPropagator<Var> {
    fn name(&self) -> &str {
        "NotEqualConstant"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn setup(&mut self, context: SetupContext<'_>, _: PropagationStrength) -> PropagationStatus {
        // A single removal entails the constraint, so there is nothing to subscribe to.
        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        context.remove(&self.x, self.value)?;
        Ok(Outcome::Success)
    }
}
