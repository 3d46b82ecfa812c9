#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024
//! The matching based propagators keep exactly the values which occur in some solution. Random
//! small instances are solved by enumeration and compared against the domains after posting.

use fdprop_core::constraints;
use fdprop_core::propagation::Constraint;
use fdprop_core::propagation::ReadDomains;
use fdprop_core::variables::DomainId;
use fdprop_core::PropagationStrength;
use fdprop_core::Store;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

const NUM_INSTANCES: usize = 200;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Between two and five domains, each a non-empty subset of `1..=5`.
fn random_domains(rng: &mut SmallRng) -> Vec<Vec<i32>> {
    let num_variables = rng.gen_range(2..=5);
    (0..num_variables)
        .map(|_| loop {
            let domain: Vec<i32> = (1..=5).filter(|_| rng.gen_bool(0.5)).collect();
            if !domain.is_empty() {
                break domain;
            }
        })
        .collect()
}

/// Calls `visit` with every combination of values from the domains.
fn for_each_assignment(domains: &[Vec<i32>], visit: &mut impl FnMut(&[i32])) {
    fn extend(
        domains: &[Vec<i32>],
        assignment: &mut Vec<i32>,
        visit: &mut impl FnMut(&[i32]),
    ) {
        if assignment.len() == domains.len() {
            visit(&assignment[..]);
            return;
        }
        for &value in &domains[assignment.len()] {
            assignment.push(value);
            extend(domains, assignment, visit);
            let _ = assignment.pop();
        }
    }

    extend(domains, &mut Vec::with_capacity(domains.len()), visit);
}

/// The values of every variable which occur in a solution, or `None` if there is no solution.
fn supported_values(
    domains: &[Vec<i32>],
    is_solution: impl Fn(&[i32]) -> bool,
) -> Option<Vec<Vec<i32>>> {
    let mut supported = vec![vec![]; domains.len()];
    let mut has_solution = false;

    for_each_assignment(domains, &mut |assignment| {
        if !is_solution(assignment) {
            return;
        }
        has_solution = true;
        for (values, &value) in supported.iter_mut().zip(assignment) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    });

    has_solution.then(|| {
        supported.iter_mut().for_each(|values| values.sort());
        supported
    })
}

/// Posts the constraint built over fresh variables with the given domains, and returns the
/// resulting domains or `None` on failure.
fn filtered_domains<C: Constraint>(
    domains: &[Vec<i32>],
    constraint: impl FnOnce(Vec<DomainId>) -> C,
) -> Option<Vec<Vec<i32>>> {
    let mut store = Store::default();
    let variables: Vec<DomainId> = domains
        .iter()
        .map(|domain| store.new_sparse_variable(domain.iter().copied()))
        .collect();

    let _ = store
        .post(constraint(variables.clone()), PropagationStrength::Strong)
        .ok()?;

    Some(
        variables
            .iter()
            .map(|var| store.iterate_domain(var).collect())
            .collect(),
    )
}

fn num_distinct(assignment: &[i32]) -> usize {
    let mut values = assignment.to_vec();
    values.sort();
    values.dedup();
    values.len()
}

#[test]
fn all_different_keeps_exactly_the_supported_values() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(1);

    for _ in 0..NUM_INSTANCES {
        let domains = random_domains(&mut rng);

        let expected = supported_values(&domains, |assignment| {
            num_distinct(assignment) == assignment.len()
        });
        let actual = filtered_domains(&domains, |variables| {
            constraints::all_different::<DomainId>(variables)
        });

        assert_eq!(expected, actual, "domains: {domains:?}");
    }
}

#[test]
fn global_cardinality_keeps_exactly_the_supported_values() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(2);

    for _ in 0..NUM_INSTANCES {
        let domains = random_domains(&mut rng);
        let num_variables = domains.len() as u32;

        let values = vec![1, 2, 3];
        let min_counts: Vec<u32> = values.iter().map(|_| rng.gen_range(0..=1)).collect();
        let max_counts: Vec<u32> = min_counts
            .iter()
            .map(|&min| rng.gen_range(min..=num_variables.min(2)))
            .collect();

        let expected = supported_values(&domains, |assignment| {
            values.iter().enumerate().all(|(index, value)| {
                let count = assignment.iter().filter(|&other| other == value).count() as u32;
                (min_counts[index]..=max_counts[index]).contains(&count)
            })
        });
        let actual = filtered_domains(&domains, |variables| {
            constraints::global_cardinality::<DomainId>(
                variables,
                values.clone(),
                min_counts.clone(),
                max_counts.clone(),
            )
        });

        assert_eq!(
            expected, actual,
            "domains: {domains:?}, min: {min_counts:?}, max: {max_counts:?}"
        );
    }
}

#[test]
fn at_least_n_value_keeps_exactly_the_supported_values() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(3);

    for _ in 0..NUM_INSTANCES {
        let domains = random_domains(&mut rng);
        let n = rng.gen_range(1..=domains.len());

        let expected = supported_values(&domains, |assignment| num_distinct(assignment) >= n);
        let actual = filtered_domains(&domains, |variables| {
            constraints::at_least_n_value::<DomainId>(variables, n)
        });

        assert_eq!(expected, actual, "domains: {domains:?}, n: {n}");
    }
}
