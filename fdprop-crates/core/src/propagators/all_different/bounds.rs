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

/// Bounds consistency for all-different.
///
/// An interval `[a, b]` which contains the domains of exactly `b - a + 1` variables is a Hall
/// interval: those variables use up all of its values, so every other variable has to avoid it.
/// A variable whose lower bound lies in a Hall interval moves its lower bound past the interval,
/// and symmetrically for the upper bound. More than `b - a + 1` variables inside `[a, b]` is a
/// failure.
#[derive(Clone, Debug)]
pub(crate) struct AllDifferentBounds<Var> {
    variables: Box<[Var]>,
    bounds: Vec<(i32, i32)>,
    /// Variable indices sorted by upper bound.
    by_upper_bound: Vec<usize>,
    /// Variable indices sorted by lower bound, descending.
    by_lower_bound: Vec<usize>,
}

impl<Var: IntegerVariable> AllDifferentBounds<Var> {
    pub(crate) fn new(variables: Box<[Var]>) -> Self {
        let num_variables = variables.len();
        AllDifferentBounds {
            variables,
            bounds: Vec::with_capacity(num_variables),
            by_upper_bound: (0..num_variables).collect(),
            by_lower_bound: (0..num_variables).collect(),
        }
    }

    fn load_bounds(&mut self, context: &PropagationContext<'_>) {
        self.bounds.clear();
        self.bounds.extend(
            self.variables
                .iter()
                .map(|var| (context.lower_bound(var), context.upper_bound(var))),
        );

        let bounds = &self.bounds;
        self.by_upper_bound.sort_by_key(|&index| bounds[index].1);
        self.by_lower_bound
            .sort_by_key(|&index| std::cmp::Reverse(bounds[index].0));
    }

    /// The new lower bound of every variable, derived from the Hall intervals.
    fn lower_bound_updates(&self) -> Result<Vec<i32>, Inconsistency> {
        let mut new_lower_bounds: Vec<i32> = self.bounds.iter().map(|&(lower, _)| lower).collect();

        for &(start, _) in &self.bounds {
            let mut count: i64 = 0;

            for &index in &self.by_upper_bound {
                let (lower, end) = self.bounds[index];
                if lower < start {
                    continue;
                }
                count += 1;

                let width = end as i64 - start as i64 + 1;
                if count > width {
                    return Err(Inconsistency::Conflict);
                }
                if count == width {
                    // [start, end] is a Hall interval.
                    for (other, &(other_lower, other_upper)) in self.bounds.iter().enumerate() {
                        if other_upper > end && (start..=end).contains(&other_lower) {
                            new_lower_bounds[other] = new_lower_bounds[other].max(end + 1);
                        }
                    }
                }
            }
        }

        Ok(new_lower_bounds)
    }

    fn upper_bound_updates(&self) -> Result<Vec<i32>, Inconsistency> {
        let mut new_upper_bounds: Vec<i32> = self.bounds.iter().map(|&(_, upper)| upper).collect();

        for &(_, end) in &self.bounds {
            let mut count: i64 = 0;

            for &index in &self.by_lower_bound {
                let (start, upper) = self.bounds[index];
                if upper > end {
                    continue;
                }
                count += 1;

                let width = end as i64 - start as i64 + 1;
                if count > width {
                    return Err(Inconsistency::Conflict);
                }
                if count == width {
                    for (other, &(other_lower, other_upper)) in self.bounds.iter().enumerate() {
                        if other_lower < start && (start..=end).contains(&other_upper) {
                            new_upper_bounds[other] = new_upper_bounds[other].min(start - 1);
                        }
                    }
                }
            }
        }

        Ok(new_upper_bounds)
    }
}

impl<Var: IntegerVariable + 'static> Constraint for AllDifferentBounds<Var> {
    fn name(&self) -> &str {
        "AllDifferentBounds"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        _: PropagationStrength,
    ) -> PropagationStatus {
        for var in self.variables.iter() {
            context.call_propagate_when_bounds(var);
        }

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        // New bounds can create new Hall intervals, so repeat until nothing changes.
        loop {
            self.load_bounds(&context);

            let new_lower_bounds = self.lower_bound_updates()?;
            let new_upper_bounds = self.upper_bound_updates()?;

            let mut changed = false;
            for (index, var) in self.variables.iter().enumerate() {
                let (lower, upper) = self.bounds[index];

                if new_lower_bounds[index] > lower {
                    context.set_lower_bound(var, new_lower_bounds[index])?;
                    changed = true;
                }
                if new_upper_bounds[index] < upper {
                    context.set_upper_bound(var, new_upper_bounds[index])?;
                    changed = true;
                }
            }

            if !changed {
                return Ok(Outcome::Suspend);
            }
        }
    }
}
