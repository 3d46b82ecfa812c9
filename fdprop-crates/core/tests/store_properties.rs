#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024
//! Properties of the store which hold for any set of constraints: domains only shrink along a
//! branch, popping a choice point restores exactly what was there before, and subscribers only
//! hear about the events which happened.

use fdprop_core::constraints;
use fdprop_core::propagation::Constraint;
use fdprop_core::propagation::PropagationContext;
use fdprop_core::propagation::ReadDomains;
use fdprop_core::propagation::SetupContext;
use fdprop_core::variables::DomainId;
use fdprop_core::Outcome;
use fdprop_core::PropagationStatus;
use fdprop_core::PropagationStrength;
use fdprop_core::Store;
use fdprop_core::TrailedInteger;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn domains(store: &Store) -> Vec<Vec<i32>> {
    store
        .variables()
        .map(|var| store.iterate_domain(&var).collect())
        .collect()
}

fn is_subset(smaller: &[Vec<i32>], larger: &[Vec<i32>]) -> bool {
    smaller
        .iter()
        .zip(larger)
        .all(|(small, large)| small.iter().all(|value| large.contains(value)))
}

/// Three all-different constraints over overlapping windows of six variables, plus a chain of
/// inequalities.
fn post_model(store: &mut Store) -> Vec<DomainId> {
    let variables: Vec<DomainId> = (0..6).map(|_| store.new_interval_variable(1, 6)).collect();

    for window in variables.windows(3) {
        let _ = store
            .post(
                constraints::all_different(window.to_vec()),
                PropagationStrength::Strong,
            )
            .expect("the model is satisfiable");
    }
    let _ = store
        .post(
            constraints::less_than_or_equals(variables[0], variables[5]),
            PropagationStrength::Weak,
        )
        .expect("the model is satisfiable");

    variables
}

#[test]
fn three_variables_with_three_values_keep_their_domains_and_binding_is_seen_immediately() {
    init_logger();
    let mut store = Store::default();
    let x = store.new_interval_variable(1, 3);
    let y = store.new_interval_variable(1, 3);
    let z = store.new_interval_variable(1, 3);

    let _ = store
        .post(
            constraints::all_different(vec![x, y, z]),
            PropagationStrength::Strong,
        )
        .expect("satisfiable");
    assert_eq!(vec![vec![1, 2, 3]; 3], domains(&store));

    store.push_state();
    store.assign(&x, 2).expect("2 is in the domain of x");

    // The queue has not been run yet.
    assert_eq!(vec![1, 3], store.iterate_domain(&y).collect::<Vec<_>>());
    assert_eq!(vec![1, 3], store.iterate_domain(&z).collect::<Vec<_>>());
}

#[test]
fn popping_once_undoes_only_the_innermost_assignment() {
    init_logger();
    let mut store = Store::default();
    let x = store.new_interval_variable(0, 9);
    let y = store.new_interval_variable(0, 9);

    store.push_state();
    store.assign(&x, 4).expect("non-empty");
    store.push_state();
    store.assign(&y, 7).expect("non-empty");

    store.pop();

    assert_eq!(Some(4), store.fixed_value(&x));
    assert_eq!(0, store.lower_bound(&y));
    assert_eq!(9, store.upper_bound(&y));
    assert_eq!(1, store.get_checkpoint());
}

#[test]
fn domains_only_shrink_along_a_branch_and_are_restored_exactly() {
    init_logger();
    let mut rng = SmallRng::seed_from_u64(42);

    for _ in 0..50 {
        let mut store = Store::default();
        let variables = post_model(&mut store);
        let root = domains(&store);

        let mut snapshots = vec![];
        let mut previous = root.clone();

        for _ in 0..variables.len() {
            snapshots.push(domains(&store));
            store.push_state();

            let var = variables[rng.gen_range(0..variables.len())];
            let value = rng.gen_range(1..=6);
            let result = match rng.gen_range(0..4) {
                0 => store.assign(&var, value),
                1 => store.remove_value(&var, value),
                2 => store.update_min(&var, value),
                _ => store.update_max(&var, value),
            }
            .and_then(|_| store.propagate());

            if result.is_err() {
                assert!(store.is_failed());
                break;
            }

            let current = domains(&store);
            assert!(is_subset(&current, &previous));
            previous = current;
        }

        while let Some(snapshot) = snapshots.pop() {
            store.pop();
            assert!(!store.is_failed());
            assert_eq!(snapshot, domains(&store));
        }
        assert_eq!(root, domains(&store));
    }
}

/// Counts the fixed variables in a reversible integer.
#[derive(Debug)]
struct CountFixed {
    variables: Vec<DomainId>,
    num_fixed: Option<TrailedInteger>,
}

impl Constraint for CountFixed {
    fn name(&self) -> &str {
        "CountFixed"
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        _: PropagationStrength,
    ) -> PropagationStatus {
        self.num_fixed = Some(context.new_trailed_integer(0));
        for var in &self.variables {
            context.call_propagate_when_bind(var);
        }

        self.propagate(context.into_propagation_context())
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        let num_fixed = self
            .variables
            .iter()
            .filter(|&var| context.is_fixed(var))
            .count();
        context.write(self.num_fixed.expect("set during setup"), num_fixed as i64);

        Ok(Outcome::Suspend)
    }
}

#[test]
fn reversible_integers_are_restored_with_the_domains() {
    init_logger();
    let mut store = Store::default();
    let variables: Vec<DomainId> = (0..3).map(|_| store.new_interval_variable(0, 2)).collect();

    let handle = store
        .post(
            CountFixed {
                variables: variables.clone(),
                num_fixed: None,
            },
            PropagationStrength::Weak,
        )
        .expect("no failure");
    let num_fixed = store
        .get_constraint(handle)
        .and_then(|constraint| constraint.num_fixed)
        .expect("set during setup");

    store.push_state();
    store.assign(&variables[0], 1).expect("non-empty");
    store.propagate().expect("no failure");
    assert_eq!(1, store.read(num_fixed));

    store.push_state();
    store.assign(&variables[1], 1).expect("non-empty");
    store.assign(&variables[2], 1).expect("non-empty");
    store.propagate().expect("no failure");
    assert_eq!(3, store.read(num_fixed));

    store.pop();
    assert_eq!(1, store.read(num_fixed));
    store.pop();
    assert_eq!(0, store.read(num_fixed));
}

/// Counts how often it is propagated.
#[derive(Debug)]
struct BoundWatcher {
    var: DomainId,
    num_calls: usize,
}

impl Constraint for BoundWatcher {
    fn name(&self) -> &str {
        "BoundWatcher"
    }

    fn setup(
        &mut self,
        mut context: SetupContext<'_>,
        _: PropagationStrength,
    ) -> PropagationStatus {
        context.call_propagate_when_min(&self.var);
        context.call_propagate_when_max(&self.var);
        context.call_propagate_when_bind(&self.var);
        Ok(Outcome::Suspend)
    }

    fn propagate(&mut self, _: PropagationContext<'_>) -> PropagationStatus {
        self.num_calls += 1;
        Ok(Outcome::Suspend)
    }
}

#[test]
fn interior_removals_do_not_wake_bound_subscribers() {
    init_logger();
    let mut store = Store::default();
    let x = store.new_interval_variable(1, 5);
    let handle = store
        .post(
            BoundWatcher {
                var: x,
                num_calls: 0,
            },
            PropagationStrength::Weak,
        )
        .expect("no failure");
    let num_calls = |store: &Store| {
        store
            .get_constraint(handle)
            .map(|watcher| watcher.num_calls)
            .expect("posted")
    };

    store.remove_value(&x, 3).expect("non-empty");
    store.remove_value(&x, 2).expect("non-empty");
    store.propagate().expect("no failure");
    assert_eq!(0, num_calls(&store));

    // Removing 1 moves the lower bound past the holes to 4.
    store.remove_value(&x, 1).expect("non-empty");
    store.propagate().expect("no failure");
    assert_eq!(1, num_calls(&store));
    assert_eq!(4, store.lower_bound(&x));

    // Removing 4 binds the variable and moves the lower bound again.
    store.remove_value(&x, 4).expect("non-empty");
    store.propagate().expect("no failure");
    assert_eq!(2, num_calls(&store));
    assert_eq!(Some(5), store.fixed_value(&x));
}
