use super::Constraint;
use crate::containers::HashSet;
use crate::propagators::AtLeastNValue;
use crate::propagators::GlobalCardinality;
use crate::variables::IntegerVariable;

/// Creates the [`Constraint`] that value `values[i]` is taken by at least `min_counts[i]` and at
/// most `max_counts[i]` of the `variables`. Values which are not listed may be taken by any
/// number of variables.
///
/// [`PropagationStrength::Weak`](crate::PropagationStrength::Weak) only counts occurrences;
/// stronger strengths also enforce arc consistency through a flow with lower and upper
/// capacities.
///
/// # Panics
/// If the three slices differ in length, if a value is listed twice, or if a minimum count
/// exceeds its maximum count.
pub fn global_cardinality<Var: IntegerVariable + 'static>(
    variables: impl Into<Box<[Var]>>,
    values: impl Into<Box<[i32]>>,
    min_counts: impl Into<Box<[u32]>>,
    max_counts: impl Into<Box<[u32]>>,
) -> impl Constraint {
    let values: Box<[i32]> = values.into();
    let min_counts: Box<[u32]> = min_counts.into();
    let max_counts: Box<[u32]> = max_counts.into();

    assert!(
        values.len() == min_counts.len() && values.len() == max_counts.len(),
        "every listed value needs a minimum and a maximum count"
    );
    assert!(
        min_counts.iter().zip(max_counts.iter()).all(|(min, max)| min <= max),
        "a minimum count exceeds its maximum count"
    );
    assert_eq!(
        values.len(),
        values.iter().collect::<HashSet<_>>().len(),
        "a value is listed twice"
    );

    GlobalCardinality::new(variables.into(), values, min_counts, max_counts)
}

/// Creates the [`Constraint`] that the `variables` take at least `n` distinct values.
///
/// [`PropagationStrength::Weak`](crate::PropagationStrength::Weak) checks whether enough values
/// remain possible; stronger strengths also use a maximum matching between the variables and
/// their values.
pub fn at_least_n_value<Var: IntegerVariable + 'static>(
    variables: impl Into<Box<[Var]>>,
    n: usize,
) -> impl Constraint {
    AtLeastNValue::new(variables.into(), n)
}
