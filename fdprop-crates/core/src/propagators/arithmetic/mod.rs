mod binary_not_equals;
mod less_or_equal;
mod not_equal_constant;

pub(crate) use binary_not_equals::BinaryNotEqualsPropagator;
pub(crate) use less_or_equal::LessOrEqualPropagator;
pub(crate) use not_equal_constant::NotEqualConstantPropagator;
