use super::domain::IntegerDomain;
use super::IntegerDomainIterator;
use super::TrailedInteger;
use super::TrailedValues;
use crate::basic_types::EmptyDomain;
use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;

/// The domains of all variables together with every other reversible cell.
///
/// All reversible state shares a single [`TrailedValues`], so creating or restoring a checkpoint
/// is one operation regardless of how many domains and constraints exist. The mutating methods
/// only change the domains; notifying constraints is the responsibility of the
/// [`Store`](crate::Store).
#[derive(Debug, Default)]
pub struct Assignments {
    trailed_values: TrailedValues,
    domains: KeyedVec<DomainId, IntegerDomain>,
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        let domain = IntegerDomain::new(&mut self.trailed_values, lower_bound, upper_bound);
        self.domains.push(domain)
    }

    pub(crate) fn create_new_integer_variable_sparse(&mut self, mut values: Vec<i32>) -> DomainId {
        values.sort();
        values.dedup();

        let domain = IntegerDomain::new_sparse(&mut self.trailed_values, &values);
        self.domains.push(domain)
    }

    pub(crate) fn num_domains(&self) -> u32 {
        self.domains.len() as u32
    }

    pub(crate) fn get_domains(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trailed_values.new_checkpoint();
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trailed_values.get_checkpoint()
    }

    /// Restores all reversible state to the given checkpoint and returns the number of undone
    /// trail entries.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> usize {
        self.trailed_values.synchronise(new_checkpoint)
    }
}

// Reversible integers.
impl Assignments {
    pub(crate) fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }

    pub(crate) fn read_trailed_integer(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values.read(trailed_integer)
    }

    pub(crate) fn write_trailed_integer(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value);
    }

    pub(crate) fn add_assign_trailed_integer(
        &mut self,
        trailed_integer: TrailedInteger,
        addition: i64,
    ) {
        self.trailed_values.add_assign(trailed_integer, addition);
    }
}

// Domain queries.
impl Assignments {
    pub(crate) fn get_lower_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].lower_bound(&self.trailed_values)
    }

    pub(crate) fn get_upper_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].upper_bound(&self.trailed_values)
    }

    pub(crate) fn get_size(&self, domain_id: DomainId) -> usize {
        self.domains[domain_id].size(&self.trailed_values)
    }

    pub(crate) fn is_value_in_domain(&self, domain_id: DomainId, value: i32) -> bool {
        self.domains[domain_id].contains(&self.trailed_values, value)
    }

    pub(crate) fn is_domain_assigned(&self, domain_id: DomainId) -> bool {
        self.get_size(domain_id) == 1
    }

    /// The smallest value in the domain strictly greater than `value`.
    pub(crate) fn get_next_value(&self, domain_id: DomainId, value: i32) -> Option<i32> {
        let from = value.checked_add(1)?;
        self.domains[domain_id].next_present(&self.trailed_values, from)
    }

    /// The largest value in the domain strictly smaller than `value`.
    pub(crate) fn get_previous_value(&self, domain_id: DomainId, value: i32) -> Option<i32> {
        let from = value.checked_sub(1)?;
        self.domains[domain_id].previous_present(&self.trailed_values, from)
    }

    pub(crate) fn get_domain_iterator(&self, domain_id: DomainId) -> IntegerDomainIterator<'_> {
        self.domains[domain_id].iter(&self.trailed_values)
    }
}

// Domain mutations. Each returns whether the domain changed.
impl Assignments {
    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain_id: DomainId,
        new_lower_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.domains[domain_id].set_lower_bound(&mut self.trailed_values, new_lower_bound)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain_id: DomainId,
        new_upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        self.domains[domain_id].set_upper_bound(&mut self.trailed_values, new_upper_bound)
    }

    pub(crate) fn make_assignment(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        self.domains[domain_id].assign(&mut self.trailed_values, value)
    }

    pub(crate) fn remove_value_from_domain(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        self.domains[domain_id].remove_value(&mut self.trailed_values, value)
    }
}
