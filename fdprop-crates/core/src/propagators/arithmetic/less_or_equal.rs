use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Bounds propagator for the constraint `x <= y`.
#[derive(Clone, Debug)]
pub(crate) struct LessOrEqualPropagator<XVar, YVar> {
    x: XVar,
    y: YVar,
}

impl<XVar, YVar> LessOrEqualPropagator<XVar, YVar> {
    pub(crate) fn new(x: XVar, y: YVar) -> Self {
        LessOrEqualPropagator { x, y }
    }
}

impl<XVar, YVar> Constraint for LessOrEqualPropagator<XVar, YVar>
where
    XVar: IntegerVariable + 'static,
    YVar: IntegerVariable + 'static,
{
    fn name(&self) -> &str {
        "LessOrEqual"
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
        context.call_propagate_when_min(&self.x);
        context.call_propagate_when_max(&self.y);

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        let x_lb = context.lower_bound(&self.x);
        context.set_lower_bound(&self.y, x_lb)?;

        let y_ub = context.upper_bound(&self.y);
        context.set_upper_bound(&self.x, y_ub)?;

        if context.upper_bound(&self.x) <= context.lower_bound(&self.y) {
            return Ok(Outcome::Success);
        }

        Ok(Outcome::Suspend)
    }
}
