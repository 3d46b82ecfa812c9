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

/// Arc consistency for all-different: a value survives iff some assignment of distinct values to
/// all variables uses it.
#[derive(Debug)]
pub(crate) struct AllDifferentMatching<Var> {
    variables: Box<[Var]>,
    matching: Option<MatchingPropagation>,
}

impl<Var: IntegerVariable> AllDifferentMatching<Var> {
    pub(crate) fn new(variables: Box<[Var]>) -> Self {
        AllDifferentMatching {
            variables,
            matching: None,
        }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for AllDifferentMatching<Var> {
    fn name(&self) -> &str {
        "AllDifferentMatching"
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
        if matching.maximise() < self.variables.len() {
            return Err(Inconsistency::Conflict);
        }

        for &(variable, value) in matching.unsupported_values(false) {
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
