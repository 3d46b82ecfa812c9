use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStrength;
use crate::engine::variables::IntegerVariable;
use crate::engine::Store;
use crate::engine::TrailedInteger;
use crate::propagation::Constraint;

/// [`PropagationContext`] is passed to constraints whenever they are invoked.
///
/// It may be queried to retrieve information about the current variable domains through
/// [`ReadDomains`](crate::propagation::ReadDomains), or used to change the domain of a variable.
/// Every change is reported to the subscribed constraints before the method returns.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) store: &'a mut Store,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(store: &'a mut Store) -> Self {
        PropagationContext { store }
    }

    /// Creates a context with a shorter lifetime, so it can be passed by value to a helper.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            store: &mut *self.store,
        }
    }

    pub fn remove<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), Inconsistency> {
        var.remove(self.store, value)
    }

    pub fn set_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<(), Inconsistency> {
        var.set_lower_bound(self.store, bound)
    }

    pub fn set_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        bound: i32,
    ) -> Result<(), Inconsistency> {
        var.set_upper_bound(self.store, bound)
    }

    pub fn assign<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> Result<(), Inconsistency> {
        var.assign(self.store, value)
    }

    /// Sets the value of a reversible integer; the old value is restored on backtracking.
    pub fn write(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.store
            .assignments_mut()
            .write_trailed_integer(trailed_integer, value);
    }

    pub fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.store
            .assignments_mut()
            .add_assign_trailed_integer(trailed_integer, addition);
    }

    /// Posts another constraint from within a running one.
    ///
    /// The new constraint is set up immediately; the propagation it triggers joins the fixed
    /// point computation which is already in progress.
    pub fn post<C: Constraint>(
        &mut self,
        constraint: C,
        strength: PropagationStrength,
    ) -> Result<(), Inconsistency> {
        let _ = self.store.add_constraint(Box::new(constraint), strength)?;
        Ok(())
    }

    pub fn get_checkpoint(&self) -> usize {
        self.store.get_checkpoint()
    }
}
