use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::basic_types::PropagationStrength;
use crate::containers::HashMap;
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

/// Arc consistency for the global cardinality constraint.
///
/// Every variable is matched to a value, and every value to between its minimum and maximum
/// number of variables; values which are not listed may be used by any number of variables.
#[derive(Debug)]
pub(crate) struct GlobalCardinalityMatching<Var> {
    variables: Box<[Var]>,
    capacities: HashMap<i32, ValueCapacity>,
    matching: Option<MatchingPropagation>,
}

impl<Var: IntegerVariable> GlobalCardinalityMatching<Var> {
    pub(crate) fn new(
        variables: Box<[Var]>,
        values: &[i32],
        min_counts: &[u32],
        max_counts: &[u32],
    ) -> Self {
        let capacities = values
            .iter()
            .zip(min_counts.iter().zip(max_counts))
            .map(|(&value, (&lower, &upper))| (value, ValueCapacity { lower, upper }))
            .collect();

        GlobalCardinalityMatching {
            variables,
            capacities,
            matching: None,
        }
    }
}

impl<Var: IntegerVariable + 'static> Constraint for GlobalCardinalityMatching<Var> {
    fn name(&self) -> &str {
        "GlobalCardinalityMatching"
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

        // The listed values take part even when no domain contains them, so that their minimum
        // counts are checked.
        let domains = value_range(&*context, &self.variables);
        let min = self
            .capacities
            .keys()
            .copied()
            .fold(*domains.start(), i32::min);
        let max = self
            .capacities
            .keys()
            .copied()
            .fold(*domains.end(), i32::max);

        let unlisted = ValueCapacity {
            lower: 0,
            upper: self.variables.len() as u32,
        };
        self.matching = Some(MatchingPropagation::new(
            self.variables.len(),
            min..=max,
            |value| self.capacities.get(&value).copied().unwrap_or(unlisted),
        ));

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        let matching = self
            .matching
            .as_mut()
            .expect("the matching is created during setup");

        matching.load_domains(&context, &self.variables);
        if matching.maximise() < self.variables.len() || !matching.repair_lower_capacities() {
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
