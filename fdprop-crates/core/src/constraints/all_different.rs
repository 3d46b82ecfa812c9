use super::Constraint;
use crate::propagators::AllDifferent;
use crate::variables::IntegerVariable;

/// Creates the [`Constraint`] that enforces that all the given `variables` are distinct.
///
/// Every strength removes the value of a fixed variable from the others immediately.
/// [`PropagationStrength::Medium`](crate::PropagationStrength::Medium) adds bounds consistency
/// and [`PropagationStrength::Strong`](crate::PropagationStrength::Strong) adds arc consistency.
pub fn all_different<Var: IntegerVariable + 'static>(
    variables: impl Into<Box<[Var]>>,
) -> impl Constraint {
    AllDifferent::new(variables.into())
}
