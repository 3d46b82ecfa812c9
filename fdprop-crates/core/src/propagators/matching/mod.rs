//! Matching based filtering shared by the all-different family.
//!
//! The variables and the values form a bipartite graph with an edge `x - v` for every value `v`
//! in the domain of `x`. Each value can be matched to a number of variables between its lower
//! and upper capacity. A constraint of the family is satisfiable iff there is a matching which
//! respects the capacities and covers enough variables, and a value `v` can be removed from `x`
//! iff the edge `x - v` does not occur in any such matching.
//!
//! The edges which occur in some maximum matching are exactly the edges of the current matching
//! together with the edges on an alternating cycle or on an even alternating path starting at a
//! free node. Both are characterised by the strongly connected components of the residual graph
//! built by [`MatchingPropagation::unsupported_values`].
//!
//! The matching is kept between calls and repaired against the current domains, so that after a
//! few removals only a few augmenting paths have to be found. It is not reversible: it is valid
//! for any domains once it has been repaired.
mod scc;

use std::ops::RangeInclusive;

use scc::Graph;
use scc::StronglyConnectedComponents;

use crate::create_statistics_struct;
use crate::engine::variables::IntegerVariable;
use crate::fdprop_asserts::fdprop_assert_advanced;
use crate::fdprop_asserts::fdprop_assert_eq_simple;
use crate::fdprop_asserts::fdprop_assert_extreme;
use crate::fdprop_asserts::fdprop_assert_moderate;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The number of variables a value can be matched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ValueCapacity {
    pub(crate) lower: u32,
    pub(crate) upper: u32,
}

impl ValueCapacity {
    /// A value which may be used at most once.
    pub(crate) const AT_MOST_ONCE: ValueCapacity = ValueCapacity { lower: 0, upper: 1 };
}

create_statistics_struct!(MatchingStatistics {
    num_calls: u64,
    num_augmenting_paths: u64,
    num_values_removed: u64,
});

/// A node on an alternating path together with the position of the next edge to explore.
#[derive(Clone, Copy, Debug)]
enum PathNode {
    Variable { variable: usize, next_edge: usize },
    Value { value: usize, next_edge: usize },
}

#[derive(Debug)]
pub(crate) struct MatchingPropagation {
    /// The smallest value of the graph; value `v` is stored at index `v - offset`.
    offset: i32,
    capacities: Box<[ValueCapacity]>,

    /// The value index each variable is matched to.
    variable_match: Vec<Option<usize>>,
    /// The variables matched to each value index.
    value_matches: Vec<Vec<usize>>,
    matching_size: usize,

    /// The value indices in the domain of each variable, loaded at the start of every call.
    domains: Vec<Vec<usize>>,
    /// The variables which contain each value index, loaded at the start of every call.
    supports: Vec<Vec<usize>>,

    /// Nodes stamped with the current `stamp` have been visited by the current search; bumping
    /// the stamp clears all marks at once.
    variable_seen: Vec<u64>,
    value_seen: Vec<u64>,
    stamp: u64,

    /// The alternating path of the current augmenting search.
    path: Vec<PathNode>,

    graph: Graph,
    components: StronglyConnectedComponents,
    unsupported: Vec<(usize, i32)>,

    statistics: MatchingStatistics,
}

impl MatchingPropagation {
    /// Creates the graph for `num_variables` variables whose values lie in `values`.
    pub(crate) fn new(
        num_variables: usize,
        values: RangeInclusive<i32>,
        capacity: impl Fn(i32) -> ValueCapacity,
    ) -> Self {
        let offset = *values.start();
        let capacities: Box<[ValueCapacity]> = values.map(capacity).collect();
        fdprop_assert_moderate!(capacities
            .iter()
            .all(|capacity| capacity.lower <= capacity.upper));

        let num_values = capacities.len();

        MatchingPropagation {
            offset,
            capacities,
            variable_match: vec![None; num_variables],
            value_matches: vec![Vec::new(); num_values],
            matching_size: 0,
            domains: vec![Vec::new(); num_variables],
            supports: vec![Vec::new(); num_values],
            variable_seen: vec![0; num_variables],
            value_seen: vec![0; num_values],
            stamp: 0,
            path: Vec::new(),
            graph: Graph::default(),
            components: StronglyConnectedComponents::default(),
            unsupported: Vec::new(),
            statistics: MatchingStatistics::default(),
        }
    }

    /// Loads the current domains and drops every matched pair whose value is no longer in the
    /// domain of its variable.
    pub(crate) fn load_domains<Var: IntegerVariable>(
        &mut self,
        context: &impl ReadDomains,
        variables: &[Var],
    ) {
        fdprop_assert_eq_simple!(variables.len(), self.domains.len());
        self.statistics.num_calls += 1;

        self.supports.iter_mut().for_each(Vec::clear);

        for (variable, var) in variables.iter().enumerate() {
            let domain = &mut self.domains[variable];
            domain.clear();

            for value in context.iterate_domain(var) {
                let index = value_index(self.offset, value);
                fdprop_assert_moderate!(
                    index < self.capacities.len(),
                    "{value} lies outside of the values of the matching graph"
                );

                domain.push(index);
                self.supports[index].push(variable);
            }

            if let Some(matched) = self.variable_match[variable] {
                if self.domains[variable].binary_search(&matched).is_err() {
                    self.unmatch(variable);
                }
            }
        }
    }

    /// Extends the matching to a maximum one with augmenting paths from the free variables, and
    /// returns its size.
    pub(crate) fn maximise(&mut self) -> usize {
        for variable in 0..self.domains.len() {
            if self.variable_match[variable].is_none() {
                self.stamp += 1;
                if self.augment_from_variable(variable) {
                    self.statistics.num_augmenting_paths += 1;
                }
            }
        }

        fdprop_assert_extreme!(
            self.matching_size == self.variable_match.iter().flatten().count()
        );
        self.matching_size
    }

    /// Moves variables along alternating paths until every value is matched at least its lower
    /// capacity. Returns `false` if some value cannot reach its lower capacity.
    pub(crate) fn repair_lower_capacities(&mut self) -> bool {
        for value in 0..self.capacities.len() {
            while self.value_matches[value].len() < self.capacities[value].lower as usize {
                self.stamp += 1;
                if !self.augment_towards_value(value) {
                    return false;
                }
                self.statistics.num_augmenting_paths += 1;
            }
        }

        true
    }

    /// Returns the pairs `(variable, value)` which do not occur in any maximum matching that
    /// respects the capacities.
    ///
    /// When `allow_unmatched` is set, variables may stay unmatched in a maximum matching; a value
    /// is then also supported if the variable can be left unmatched.
    pub(crate) fn unsupported_values(&mut self, allow_unmatched: bool) -> &[(usize, i32)] {
        self.build_residual_graph(allow_unmatched);
        self.components.compute(&self.graph);

        let num_variables = self.domains.len();
        self.unsupported.clear();

        if self.components.num_components() == 1 {
            return &self.unsupported;
        }

        for (variable, domain) in self.domains.iter().enumerate() {
            let variable_component = self.components.component(variable);

            for &value in domain {
                if self.variable_match[variable] != Some(value)
                    && self.components.component(num_variables + value) != variable_component
                {
                    self.unsupported
                        .push((variable, self.offset + value as i32));
                }
            }
        }

        self.statistics.num_values_removed += self.unsupported.len() as u64;
        &self.unsupported
    }

    pub(crate) fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }

    /// The residual graph has a node per variable, a node per value and a sink, plus a source
    /// when variables may stay unmatched. Its edges are
    /// - `variable -> value` for every value in the domain which is not the match of the variable;
    /// - `value -> variable` for every variable matched to the value;
    /// - `value -> sink` if the value is below its upper capacity;
    /// - `sink -> value` if the value is above its lower capacity;
    /// - `source -> variable` for free variables and `variable -> source` for matched ones.
    fn build_residual_graph(&mut self, allow_unmatched: bool) {
        let num_variables = self.domains.len();
        let num_values = self.capacities.len();
        let sink = num_variables + num_values;
        let source = sink + 1;

        self.graph
            .reset(if allow_unmatched { source + 1 } else { sink + 1 });

        for (variable, domain) in self.domains.iter().enumerate() {
            let matched = self.variable_match[variable];

            for &value in domain {
                if matched != Some(value) {
                    self.graph.add_edge(variable, num_variables + value);
                }
            }

            if allow_unmatched {
                if matched.is_some() {
                    self.graph.add_edge(variable, source);
                } else {
                    self.graph.add_edge(source, variable);
                }
            }
        }

        for (value, matches) in self.value_matches.iter().enumerate() {
            let value_node = num_variables + value;
            let capacity = self.capacities[value];

            for &variable in matches {
                self.graph.add_edge(value_node, variable);
            }
            if matches.len() < capacity.upper as usize {
                self.graph.add_edge(value_node, sink);
            }
            if matches.len() > capacity.lower as usize {
                self.graph.add_edge(sink, value_node);
            }
        }
    }

    /// Searches an alternating path from `root` to a value below its upper capacity and flips
    /// it.
    fn augment_from_variable(&mut self, root: usize) -> bool {
        self.path.clear();
        self.variable_seen[root] = self.stamp;
        self.path.push(PathNode::Variable {
            variable: root,
            next_edge: 0,
        });

        while let Some(&node) = self.path.last() {
            match node {
                PathNode::Variable {
                    variable,
                    next_edge,
                } => {
                    if next_edge == self.domains[variable].len() {
                        let _ = self.path.pop();
                        continue;
                    }
                    self.advance_top();

                    let value = self.domains[variable][next_edge];
                    if self.variable_match[variable] == Some(value)
                        || self.value_seen[value] == self.stamp
                    {
                        continue;
                    }
                    self.value_seen[value] = self.stamp;

                    if self.value_matches[value].len() < self.capacities[value].upper as usize {
                        self.flip_path_to(value);
                        return true;
                    }

                    self.path.push(PathNode::Value {
                        value,
                        next_edge: 0,
                    });
                }
                PathNode::Value { value, next_edge } => {
                    if next_edge == self.value_matches[value].len() {
                        let _ = self.path.pop();
                        continue;
                    }
                    self.advance_top();

                    let other = self.value_matches[value][next_edge];
                    if self.variable_seen[other] == self.stamp {
                        continue;
                    }
                    self.variable_seen[other] = self.stamp;

                    self.path.push(PathNode::Variable {
                        variable: other,
                        next_edge: 0,
                    });
                }
            }
        }

        false
    }

    /// Matches every variable on the path to the value which follows it, the last one to
    /// `free_value`.
    fn flip_path_to(&mut self, free_value: usize) {
        let mut value = free_value;

        while let Some(node) = self.path.pop() {
            match node {
                PathNode::Variable { variable, .. } => self.match_to(variable, value),
                PathNode::Value { value: previous, .. } => value = previous,
            }
        }
    }

    /// Searches an alternating path which ends at a free variable or at a value above its lower
    /// capacity, and flips it so that `root` gains one variable.
    ///
    /// Every node on the path is a value; the variable which leads from a value to the next one
    /// is the support visited last by that value.
    fn augment_towards_value(&mut self, root: usize) -> bool {
        self.path.clear();
        self.value_seen[root] = self.stamp;
        self.path.push(PathNode::Value {
            value: root,
            next_edge: 0,
        });

        while let Some(&node) = self.path.last() {
            let PathNode::Value { value, next_edge } = node else {
                unreachable!("only values are pushed when moving towards a value");
            };

            if next_edge == self.supports[value].len() {
                let _ = self.path.pop();
                continue;
            }
            self.advance_top();

            let variable = self.supports[value][next_edge];
            let donor = match self.variable_match[variable] {
                Some(matched) if matched == value => continue,
                Some(matched) => matched,
                None => {
                    self.flip_supports();
                    return true;
                }
            };

            if self.value_matches[donor].len() > self.capacities[donor].lower as usize {
                self.flip_supports();
                return true;
            }

            if self.value_seen[donor] != self.stamp {
                self.value_seen[donor] = self.stamp;
                self.path.push(PathNode::Value {
                    value: donor,
                    next_edge: 0,
                });
            }
        }

        false
    }

    /// Matches the last visited support of every value on the path to that value, innermost
    /// first.
    fn flip_supports(&mut self) {
        while let Some(node) = self.path.pop() {
            if let PathNode::Value { value, next_edge } = node {
                let variable = self.supports[value][next_edge - 1];
                self.match_to(variable, value);
            }
        }
    }

    fn advance_top(&mut self) {
        if let Some(
            PathNode::Variable { next_edge, .. } | PathNode::Value { next_edge, .. },
        ) = self.path.last_mut()
        {
            *next_edge += 1;
        }
    }

    fn match_to(&mut self, variable: usize, value: usize) {
        if self.variable_match[variable].is_some() {
            self.detach(variable);
        } else {
            self.matching_size += 1;
        }

        self.variable_match[variable] = Some(value);
        self.value_matches[value].push(variable);
        fdprop_assert_advanced!(
            self.value_matches[value].len() <= self.capacities[value].upper as usize + 1
        );
    }

    fn unmatch(&mut self, variable: usize) {
        if self.variable_match[variable].is_some() {
            self.detach(variable);
            self.variable_match[variable] = None;
            self.matching_size -= 1;
        }
    }

    /// Removes the variable from the list of its matched value.
    fn detach(&mut self, variable: usize) {
        let matched = self.variable_match[variable].expect("only matched variables are detached");
        let matches = &mut self.value_matches[matched];
        let position = matches
            .iter()
            .position(|&other| other == variable)
            .expect("a matched variable is listed at its value");
        let _ = matches.swap_remove(position);
    }
}

/// The smallest range which contains the domains of all variables.
pub(crate) fn value_range<Var: IntegerVariable>(
    context: &impl ReadDomains,
    variables: &[Var],
) -> RangeInclusive<i32> {
    let min = variables
        .iter()
        .map(|var| context.lower_bound(var))
        .min()
        .unwrap_or(0);
    let max = variables
        .iter()
        .map(|var| context.upper_bound(var))
        .max()
        .unwrap_or(-1);

    min..=max
}

fn value_index(offset: i32, value: i32) -> usize {
    (value as i64 - offset as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::variables::DomainId;
    use crate::Store;

    fn load(
        store: &Store,
        variables: &[DomainId],
        values: RangeInclusive<i32>,
    ) -> MatchingPropagation {
        let mut matching =
            MatchingPropagation::new(variables.len(), values, |_| ValueCapacity::AT_MOST_ONCE);
        matching.load_domains(store, variables);
        matching
    }

    #[test]
    fn maximum_matching_uses_augmenting_paths() {
        let mut store = Store::default();
        let x = store.new_sparse_variable([1, 2]);
        let y = store.new_sparse_variable([1]);
        let z = store.new_sparse_variable([2, 3]);
        let variables = [x, y, z];

        let mut matching = load(&store, &variables, 1..=3);

        assert_eq!(3, matching.maximise());
        assert_eq!(Some(0), matching.variable_match[1]);
    }

    #[test]
    fn matching_is_repaired_after_removals() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 3);
        let y = store.new_interval_variable(1, 3);
        let variables = [x, y];

        let mut matching = load(&store, &variables, 1..=3);
        assert_eq!(2, matching.maximise());

        let matched_value = matching.variable_match[0].expect("x is matched") as i32 + 1;
        store.remove_value(&x, matched_value).expect("non-empty");

        matching.load_domains(&store, &variables);
        assert_eq!(1, matching.matching_size);
        assert_eq!(2, matching.maximise());
    }

    #[test]
    fn unsupported_values_of_a_hall_set_are_reported() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 2);
        let z = store.new_interval_variable(1, 3);
        let variables = [x, y, z];

        let mut matching = load(&store, &variables, 1..=3);
        assert_eq!(3, matching.maximise());

        let mut unsupported = matching.unsupported_values(false).to_vec();
        unsupported.sort();
        assert_eq!(vec![(2, 1), (2, 2)], unsupported);
    }

    #[test]
    fn lower_capacities_are_repaired() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 2);
        let variables = [x, y];

        let mut matching = MatchingPropagation::new(2, 1..=2, |value| ValueCapacity {
            lower: u32::from(value == 2),
            upper: 2,
        });
        matching.load_domains(&store, &variables);
        assert_eq!(2, matching.maximise());
        assert!(matching.repair_lower_capacities());
        assert!(!matching.value_matches[1].is_empty());
    }

    #[test]
    fn unreachable_lower_capacity_is_detected() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 2);
        let y = store.new_interval_variable(1, 1);
        let variables = [x, y];

        let mut matching = MatchingPropagation::new(2, 1..=2, |_| ValueCapacity {
            lower: 2,
            upper: 2,
        });
        matching.load_domains(&store, &variables);
        assert_eq!(2, matching.maximise());
        assert!(!matching.repair_lower_capacities());
    }

    /// `x_i` in `{i, i + 1}`, so that every augmenting path has to walk the whole chain.
    fn chain(store: &mut Store, length: i32) -> Vec<DomainId> {
        (0..length)
            .map(|i| store.new_interval_variable(i, i + 1))
            .collect()
    }

    #[test]
    fn long_augmenting_paths_do_not_exhaust_the_stack() {
        let length = 200_000;
        let mut store = Store::default();
        let mut variables = chain(&mut store, length);
        variables.push(store.new_interval_variable(0, 0));

        let mut matching = load(&store, &variables, 0..=length);

        assert_eq!(variables.len(), matching.maximise());
        assert_eq!(Some(0), matching.variable_match[length as usize]);
        assert_eq!(Some(length as usize), matching.variable_match[length as usize - 1]);
    }

    #[test]
    fn long_repair_paths_do_not_exhaust_the_stack() {
        let length = 200_000;
        let mut store = Store::default();
        let variables = chain(&mut store, length);

        let mut matching = MatchingPropagation::new(variables.len(), 0..=length, |value| {
            ValueCapacity {
                lower: u32::from(value > 0),
                upper: 1,
            }
        });
        matching.load_domains(&store, &variables);

        assert_eq!(variables.len(), matching.maximise());
        assert!(matching.repair_lower_capacities());
        assert!(matching.value_matches[0].is_empty());
        assert_eq!(vec![length as usize - 1], matching.value_matches[length as usize]);
    }

    #[test]
    fn free_variables_keep_all_values_when_unmatched_is_allowed() {
        let mut store = Store::default();
        let x = store.new_interval_variable(1, 1);
        let y = store.new_interval_variable(1, 1);
        let z = store.new_interval_variable(1, 2);
        let variables = [x, y, z];

        let mut matching = load(&store, &variables, 1..=2);
        assert_eq!(2, matching.maximise());

        // Whichever of x and y is free, both may take value 1; z must take 2 for two distinct
        // values, but only when the matching has to stay at size 2.
        let unsupported = matching.unsupported_values(true).to_vec();
        assert_eq!(vec![(2, 1)], unsupported);
    }
}
