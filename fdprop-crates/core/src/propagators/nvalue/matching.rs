use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::propagation::Constraint;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::SetupContext;
use crate::propagators::matching::value_range;
use crate::propagators::matching::MatchingPropagation;
use crate::propagators::matching::ValueCapacity;
use crate::statistics::StatisticLogger;
use crate::Outcome;

/// The number of distinct values an assignment can reach is the size of a maximum matching
/// between the variables and the values. If it is below `n` the constraint fails; if it equals
/// `n`, a value survives iff it occurs in some maximum matching or its variable can be left out
/// of one.
#[derive(Debug)]
pub(crate) struct AtLeastNValueMatching<Var> {
    variables: Box<[Var]>,
    n: usize,
    matching: Option<MatchingPropagation>,
}

impl<Var: IntegerVariable> AtLeastNValueMatching<Var> {
    pub(crate) fn new(variables: Box<[Var]>, n: usize) -> Self {
        AtLeastNValueMatching {
            variables,
            n,
            matching: None,
        }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for AtLeastNValueMatching<Var> {
    fn name(&self) -> &str {
        "AtLeastNValueMatching"
    }

    fn priority(&self) -> Priority {
        Priority::Low
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

        let values = value_range(&*context, &self.variables);
        self.matching = Some(MatchingPropagation::new(
            self.variables.len(),
            values,
            |_| ValueCapacity::AT_MOST_ONCE,
        ));

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        let matching = self
            .matching
            .as_mut()
            .expect("the matching is created during setup");

        matching.load_domains(&context, &self.variables);
        let num_distinct = matching.maximise();

        if num_distinct < self.n {
            return Err(Inconsistency::Conflict);
        }
        if num_distinct > self.n {
            return Ok(Outcome::Suspend);
        }

        for &(variable, value) in matching.unsupported_values(true) {
            context.remove(&self.variables[variable], value)?;
        }

        Ok(Outcome::Suspend)
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        if let Some(matching) = &self.matching {
            matching.log_statistics(statistic_logger);
        }
    }
}
