#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024
//! The fixed point does not depend on the order in which constraints are posted, and therefore
//! not on the order in which they are dequeued.

use fdprop_core::constraints;
use fdprop_core::propagation::ReadDomains;
use fdprop_core::variables::DomainId;
use fdprop_core::ConstraintOperationError;
use fdprop_core::PropagationStrength;
use fdprop_core::Store;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

const NUM_VARIABLES: usize = 6;
const MAX_VALUE: i32 = 6;

#[derive(Clone, Debug)]
enum RandomConstraint {
    AllDifferent(Vec<usize>, PropagationStrength),
    GlobalCardinality(Vec<usize>, PropagationStrength),
    AtLeastNValue(Vec<usize>, usize, PropagationStrength),
    LessThanOrEquals(usize, usize),
    NotEqual(usize, i32),
    BinaryNotEquals(usize, usize),
}

impl RandomConstraint {
    fn random(rng: &mut SmallRng) -> Self {
        let mut scope: Vec<usize> = (0..NUM_VARIABLES).collect();
        scope.shuffle(rng);
        scope.truncate(rng.gen_range(2..=4));

        let strength = *[
            PropagationStrength::Weak,
            PropagationStrength::Medium,
            PropagationStrength::Strong,
        ]
        .choose(rng)
        .expect("non-empty");

        match rng.gen_range(0..6) {
            0 => RandomConstraint::AllDifferent(scope, strength),
            1 => RandomConstraint::GlobalCardinality(scope, strength),
            2 => {
                let n = rng.gen_range(1..=scope.len());
                RandomConstraint::AtLeastNValue(scope, n, strength)
            }
            3 => RandomConstraint::LessThanOrEquals(scope[0], scope[1]),
            4 => RandomConstraint::NotEqual(scope[0], rng.gen_range(1..=MAX_VALUE)),
            _ => RandomConstraint::BinaryNotEquals(scope[0], scope[1]),
        }
    }

    fn post(
        &self,
        store: &mut Store,
        variables: &[DomainId],
    ) -> Result<(), ConstraintOperationError> {
        let scope = |indices: &[usize]| -> Vec<DomainId> {
            indices.iter().map(|&index| variables[index]).collect()
        };

        match self {
            RandomConstraint::AllDifferent(indices, strength) => {
                let _ = store.post(constraints::all_different(scope(indices)), *strength)?;
            }
            RandomConstraint::GlobalCardinality(indices, strength) => {
                // Values 1 and 2 occur at most once, value 3 at least once.
                let _ = store.post(
                    constraints::global_cardinality(
                        scope(indices),
                        vec![1, 2, 3],
                        vec![0, 0, 1],
                        vec![1, 1, indices.len() as u32],
                    ),
                    *strength,
                )?;
            }
            RandomConstraint::AtLeastNValue(indices, n, strength) => {
                let _ = store.post(constraints::at_least_n_value(scope(indices), *n), *strength)?;
            }
            RandomConstraint::LessThanOrEquals(x, y) => {
                let _ = store.post(
                    constraints::less_than_or_equals(variables[*x], variables[*y]),
                    PropagationStrength::Weak,
                )?;
            }
            RandomConstraint::NotEqual(x, value) => {
                let _ = store.post(
                    constraints::not_equal(variables[*x], *value),
                    PropagationStrength::Weak,
                )?;
            }
            RandomConstraint::BinaryNotEquals(x, y) => {
                let _ = store.post(
                    constraints::binary_not_equals(variables[*x], variables[*y]),
                    PropagationStrength::Weak,
                )?;
            }
        }

        Ok(())
    }
}

/// Posts the constraints in the given order and returns the domains at the fixed point, or
/// `None` if the store failed.
fn fixed_point(domains: &[Vec<i32>], constraints: &[RandomConstraint]) -> Option<Vec<Vec<i32>>> {
    let mut store = Store::default();
    let variables: Vec<DomainId> = domains
        .iter()
        .map(|domain| store.new_sparse_variable(domain.iter().copied()))
        .collect();

    for constraint in constraints {
        constraint.post(&mut store, &variables).ok()?;
    }

    Some(
        variables
            .iter()
            .map(|var| store.iterate_domain(var).collect())
            .collect(),
    )
}

#[test]
fn posting_order_does_not_change_the_fixed_point() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = SmallRng::seed_from_u64(7);

    for _ in 0..100 {
        let domains: Vec<Vec<i32>> = (0..NUM_VARIABLES)
            .map(|_| {
                let mut domain: Vec<i32> = (1..=MAX_VALUE)
                    .filter(|_| rng.gen_bool(0.7))
                    .collect();
                if domain.is_empty() {
                    domain.push(rng.gen_range(1..=MAX_VALUE));
                }
                domain
            })
            .collect();
        let mut constraints: Vec<RandomConstraint> = (0..rng.gen_range(2..=6))
            .map(|_| RandomConstraint::random(&mut rng))
            .collect();

        let expected = fixed_point(&domains, &constraints);

        for _ in 0..5 {
            constraints.shuffle(&mut rng);
            assert_eq!(
                expected,
                fixed_point(&domains, &constraints),
                "domains: {domains:?}, constraints: {constraints:?}"
            );
        }
    }
}
