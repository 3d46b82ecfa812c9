use super::Constraint;
use crate::propagators::BinaryNotEqualsPropagator;
use crate::propagators::LessOrEqualPropagator;
use crate::propagators::NotEqualConstantPropagator;
use crate::variables::IntegerVariable;

/// Creates the [`Constraint`] `x != value`.
pub fn not_equal<Var: IntegerVariable + 'static>(x: Var, value: i32) -> impl Constraint {
    NotEqualConstantPropagator::new(x, value)
}

/// Creates the [`Constraint`] `a != b`.
pub fn binary_not_equals<AVar, BVar>(a: AVar, b: BVar) -> impl Constraint
where
    AVar: IntegerVariable + 'static,
    BVar: IntegerVariable + 'static,
{
    BinaryNotEqualsPropagator::new(a, b)
}

/// Creates the [`Constraint`] `x <= y`.
pub fn less_than_or_equals<XVar, YVar>(x: XVar, y: YVar) -> impl Constraint
where
    XVar: IntegerVariable + 'static,
    YVar: IntegerVariable + 'static,
{
    LessOrEqualPropagator::new(x, y)
}

/// Creates the [`Constraint`] `x < y`.
pub fn less_than<XVar, YVar>(x: XVar, y: YVar) -> impl Constraint
where
    XVar: IntegerVariable + 'static,
    YVar: IntegerVariable + 'static,
{
    less_than_or_equals(x, y.offset(-1))
}
