mod propagation_context;
mod setup_context;

pub use propagation_context::PropagationContext;
pub use setup_context::SetupContext;

use crate::engine::Assignments;
use crate::engine::TrailedInteger;
use crate::engine::variables::IntegerVariable;

pub(crate) mod private {
    use super::*;

    /// Gives read access to the domains; sealed so that only the engine's contexts implement it.
    pub trait HasAssignments {
        fn assignments(&self) -> &Assignments;
    }

    impl HasAssignments for PropagationContext<'_> {
        fn assignments(&self) -> &Assignments {
            self.store.assignments()
        }
    }
}

/// Read access to the current domains of variables and to reversible integers.
pub trait ReadDomains: private::HasAssignments {
    /// Returns `true` if the domain of the given variable is singleton.
    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        self.size(var) == 1
    }

    /// The value of the variable if its domain is singleton.
    fn fixed_value<Var: IntegerVariable>(&self, var: &Var) -> Option<i32> {
        self.is_fixed(var).then(|| self.lower_bound(var))
    }

    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.assignments())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.assignments())
    }

    fn size<Var: IntegerVariable>(&self, var: &Var) -> usize {
        var.size(self.assignments())
    }

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.assignments(), value)
    }

    /// The smallest value in the domain strictly greater than `value`.
    fn next_value<Var: IntegerVariable>(&self, var: &Var, value: i32) -> Option<i32> {
        var.next_value(self.assignments(), value)
    }

    /// The largest value in the domain strictly smaller than `value`.
    fn previous_value<Var: IntegerVariable>(&self, var: &Var, value: i32) -> Option<i32> {
        var.previous_value(self.assignments(), value)
    }

    /// Iterates the domain in ascending order. Each call starts a new iteration.
    fn iterate_domain<'a, Var: IntegerVariable>(
        &'a self,
        var: &'a Var,
    ) -> impl Iterator<Item = i32> + 'a {
        var.iterate_domain(self.assignments())
    }

    fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.assignments().read_trailed_integer(trailed_integer)
    }
}

impl<T: private::HasAssignments> ReadDomains for T {}
