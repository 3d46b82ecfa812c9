//! Propagators for the constraint that all variables take distinct values.
mod bounds;
mod forward_checking;
mod matching;

pub(crate) use bounds::AllDifferentBounds;
pub(crate) use forward_checking::AllDifferentForwardChecking;
pub(crate) use matching::AllDifferentMatching;

use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::PropagationContext;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Posts the all-different propagators which match the requested strength:
/// - [`PropagationStrength::Weak`]: forward checking;
/// - [`PropagationStrength::Medium`]: forward checking and bounds consistency;
/// - [`PropagationStrength::Strong`]: forward checking and arc consistency.
///
/// The constraint itself is entailed as soon as its propagators are posted.
#[derive(Clone, Debug)]
pub(crate) struct AllDifferent<Var> {
    variables: Box<[Var]>,
}

impl<Var: IntegerVariable> AllDifferent<Var> {
    pub(crate) fn new(variables: Box<[Var]>) -> Self {
        AllDifferent { variables }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for AllDifferent<Var> {
    fn name(&self) -> &str {
        "AllDifferent"
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        strength: PropagationStrength,
    ) -> PropagationStatus {
        context.post(
            AllDifferentForwardChecking::new(self.variables.clone()),
            strength,
        )?;

        match strength {
            PropagationStrength::Weak => {}
            PropagationStrength::Medium => {
                context.post(AllDifferentBounds::new(self.variables.clone()), strength)?;
            }
            PropagationStrength::Strong => {
                context.post(AllDifferentMatching::new(self.variables.clone()), strength)?;
            }
        }

        Ok(Outcome::Success)
    }

    fn propagate(&mut self, _: PropagationContext<'_>) -> PropagationStatus {
        Ok(Outcome::Success)
    }
}
