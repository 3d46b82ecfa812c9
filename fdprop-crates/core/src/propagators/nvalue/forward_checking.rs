use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::containers::HashSet;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;
use crate::propagation::SetupContext;
use crate::Outcome;

/// Checks that enough distinct values remain possible.
///
/// With `f` distinct fixed values and `u` unfixed variables, at most `f + u` distinct values can
/// be reached, and no more than the number of values in the union of the domains. When `f + u`
/// equals the required number, every unfixed variable has to take a value which is not taken
/// yet.
#[derive(Clone, Debug)]
pub(crate) struct AtLeastNValueForwardChecking<Var> {
    variables: Box<[Var]>,
    n: usize,
    fixed_values: HashSet<i32>,
    all_values: HashSet<i32>,
}

impl<Var: IntegerVariable> AtLeastNValueForwardChecking<Var> {
    pub(crate) fn new(variables: Box<[Var]>, n: usize) -> Self {
        AtLeastNValueForwardChecking {
            variables,
            n,
            fixed_values: HashSet::default(),
            all_values: HashSet::default(),
        }
    }

    /// Returns the number of unfixed variables.
    fn load_values(&mut self, context: &PropagationContext<'_>) -> usize {
        self.fixed_values.clear();
        self.all_values.clear();

        let mut num_unfixed = 0;
        for var in self.variables.iter() {
            if let Some(value) = context.fixed_value(var) {
                let _ = self.fixed_values.insert(value);
            } else {
                num_unfixed += 1;
            }
            self.all_values.extend(context.iterate_domain(var));
        }

        num_unfixed
    }
}

impl<Var: IntegerVariable + 'static> Constraint for AtLeastNValueForwardChecking<Var> {
    fn name(&self) -> &str {
        "AtLeastNValueForwardChecking"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn idempotent(&self) -> bool {
        true
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        _: PropagationStrength,
    ) -> PropagationStatus {
        for var in self.variables.iter() {
            context.call_propagate_when_domain(var);
        }

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        loop {
            let num_unfixed = self.load_values(&context);
            let reachable = self.all_values.len().min(self.fixed_values.len() + num_unfixed);

            if reachable < self.n {
                return Err(Inconsistency::Conflict);
            }
            if self.fixed_values.len() >= self.n {
                return Ok(Outcome::Success);
            }
            if self.fixed_values.len() + num_unfixed > self.n {
                return Ok(Outcome::Suspend);
            }

            // Every unfixed variable has to contribute a new value. A variable which becomes
            // fixed by this contributes its value, which the next round removes from the others.
            let mut changed = false;
            for var in self.variables.iter() {
                if context.is_fixed(var) {
                    continue;
                }
                for &value in self.fixed_values.iter() {
                    if context.contains(var, value) {
                        context.remove(var, value)?;
                        changed = true;
                    }
                }
            }

            if !changed {
                return Ok(Outcome::Suspend);
            }
        }
    }
}
