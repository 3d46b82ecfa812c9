use super::TrailedInteger;
use super::TrailedValues;
use crate::basic_types::EmptyDomain;
use crate::fdprop_asserts::fdprop_assert_moderate;
use crate::fdprop_asserts::fdprop_assert_simple;

const WORD_BITS: i64 = u64::BITS as i64;

/// A reversible finite set of integers.
///
/// The set is represented by its bounds and size, plus a bitset of interior values that have
/// been removed. The bitset is only allocated once a value strictly between the bounds is
/// removed; its words are reversible cells like the bounds, so restoring a checkpoint restores
/// the domain exactly.
///
/// Every operation which would empty the domain returns [`EmptyDomain`] without changing
/// anything, and every operation which does not change the set returns `Ok(false)` without
/// writing to the trail.
#[derive(Debug, Clone)]
pub(crate) struct IntegerDomain {
    initial_lower_bound: i32,
    initial_upper_bound: i32,
    lower_bound: TrailedInteger,
    upper_bound: TrailedInteger,
    size: TrailedInteger,
    holes: Option<HoleSet>,
}

/// Bit `i` is set when `initial_lower_bound + i` was removed from the interior of the domain.
#[derive(Debug, Clone)]
struct HoleSet {
    words: Box<[TrailedInteger]>,
}

impl HoleSet {
    fn new(values: &mut TrailedValues, num_values: i64) -> Self {
        let num_words = (num_values + WORD_BITS - 1) / WORD_BITS;
        HoleSet {
            words: (0..num_words).map(|_| values.grow(0)).collect(),
        }
    }

    fn word(&self, values: &TrailedValues, index: usize) -> u64 {
        values.read(self.words[index]) as u64
    }

    fn is_removed(&self, values: &TrailedValues, offset: i64) -> bool {
        let word = self.word(values, (offset / WORD_BITS) as usize);
        word & (1_u64 << (offset % WORD_BITS)) != 0
    }

    fn mark_removed(&self, values: &mut TrailedValues, offset: i64) {
        let index = (offset / WORD_BITS) as usize;
        let word = self.word(values, index) | (1_u64 << (offset % WORD_BITS));
        values.assign(self.words[index], word as i64);
    }

    /// The smallest offset at least `offset` and at most `last` which is not removed.
    fn next_present(&self, values: &TrailedValues, offset: i64, last: i64) -> Option<i64> {
        let mut index = offset / WORD_BITS;
        let mut present = !self.word(values, index as usize) & (u64::MAX << (offset % WORD_BITS));

        loop {
            if present != 0 {
                let found = index * WORD_BITS + present.trailing_zeros() as i64;
                return (found <= last).then_some(found);
            }

            index += 1;
            if index * WORD_BITS > last {
                return None;
            }
            present = !self.word(values, index as usize);
        }
    }

    /// The largest offset at most `offset` and at least `first` which is not removed.
    fn previous_present(&self, values: &TrailedValues, offset: i64, first: i64) -> Option<i64> {
        let mut index = offset / WORD_BITS;
        let mut present =
            !self.word(values, index as usize) & (u64::MAX >> (WORD_BITS - 1 - offset % WORD_BITS));

        loop {
            if present != 0 {
                let found = index * WORD_BITS + (WORD_BITS - 1 - present.leading_zeros() as i64);
                return (found >= first).then_some(found);
            }

            if index == 0 || index * WORD_BITS <= first {
                return None;
            }
            index -= 1;
            present = !self.word(values, index as usize);
        }
    }

    /// The number of removed offsets in `first..=last`.
    fn count_removed(&self, values: &TrailedValues, first: i64, last: i64) -> i64 {
        let first_index = first / WORD_BITS;
        let last_index = last / WORD_BITS;

        (first_index..=last_index)
            .map(|index| {
                let mut word = self.word(values, index as usize);
                if index == first_index {
                    word &= u64::MAX << (first % WORD_BITS);
                }
                if index == last_index {
                    word &= u64::MAX >> (WORD_BITS - 1 - last % WORD_BITS);
                }
                word.count_ones() as i64
            })
            .sum()
    }
}

impl IntegerDomain {
    pub(crate) fn new(values: &mut TrailedValues, lower_bound: i32, upper_bound: i32) -> Self {
        fdprop_assert_simple!(
            lower_bound <= upper_bound,
            "cannot create a variable with an empty domain"
        );

        IntegerDomain {
            initial_lower_bound: lower_bound,
            initial_upper_bound: upper_bound,
            lower_bound: values.grow(lower_bound as i64),
            upper_bound: values.grow(upper_bound as i64),
            size: values.grow(upper_bound as i64 - lower_bound as i64 + 1),
            holes: None,
        }
    }

    /// Creates a domain containing exactly the given values, which must be sorted and free of
    /// duplicates. The initial holes are written directly, so they survive any restore.
    pub(crate) fn new_sparse(values: &mut TrailedValues, domain_values: &[i32]) -> Self {
        fdprop_assert_simple!(
            !domain_values.is_empty(),
            "cannot create a variable with an empty domain"
        );
        fdprop_assert_simple!(domain_values.windows(2).all(|pair| pair[0] < pair[1]));

        let lower_bound = domain_values[0];
        let upper_bound = domain_values[domain_values.len() - 1];
        let num_values = upper_bound as i64 - lower_bound as i64 + 1;

        let holes = (num_values != domain_values.len() as i64).then(|| {
            let num_words = ((num_values + WORD_BITS - 1) / WORD_BITS) as usize;
            let mut words = vec![u64::MAX; num_words];
            for &value in domain_values {
                let offset = value as i64 - lower_bound as i64;
                words[(offset / WORD_BITS) as usize] &= !(1_u64 << (offset % WORD_BITS));
            }

            HoleSet {
                words: words
                    .into_iter()
                    .map(|word| values.grow(word as i64))
                    .collect(),
            }
        });

        IntegerDomain {
            initial_lower_bound: lower_bound,
            initial_upper_bound: upper_bound,
            lower_bound: values.grow(lower_bound as i64),
            upper_bound: values.grow(upper_bound as i64),
            size: values.grow(domain_values.len() as i64),
            holes,
        }
    }

    pub(crate) fn lower_bound(&self, values: &TrailedValues) -> i32 {
        values.read(self.lower_bound) as i32
    }

    pub(crate) fn upper_bound(&self, values: &TrailedValues) -> i32 {
        values.read(self.upper_bound) as i32
    }

    pub(crate) fn size(&self, values: &TrailedValues) -> usize {
        values.read(self.size) as usize
    }

    pub(crate) fn contains(&self, values: &TrailedValues, value: i32) -> bool {
        value >= self.lower_bound(values)
            && value <= self.upper_bound(values)
            && !self.is_hole(values, value)
    }

    fn is_hole(&self, values: &TrailedValues, value: i32) -> bool {
        self.holes
            .as_ref()
            .is_some_and(|holes| holes.is_removed(values, self.offset(value)))
    }

    fn offset(&self, value: i32) -> i64 {
        value as i64 - self.initial_lower_bound as i64
    }

    fn value_at(&self, offset: i64) -> i32 {
        (self.initial_lower_bound as i64 + offset) as i32
    }

    /// The smallest value in the domain which is at least `value`.
    pub(crate) fn next_present(&self, values: &TrailedValues, value: i32) -> Option<i32> {
        let upper_bound = self.upper_bound(values);
        let from = value.max(self.lower_bound(values));
        if from > upper_bound {
            return None;
        }

        match &self.holes {
            None => Some(from),
            Some(holes) => holes
                .next_present(values, self.offset(from), self.offset(upper_bound))
                .map(|offset| self.value_at(offset)),
        }
    }

    /// The largest value in the domain which is at most `value`.
    pub(crate) fn previous_present(&self, values: &TrailedValues, value: i32) -> Option<i32> {
        let lower_bound = self.lower_bound(values);
        let from = value.min(self.upper_bound(values));
        if from < lower_bound {
            return None;
        }

        match &self.holes {
            None => Some(from),
            Some(holes) => holes
                .previous_present(values, self.offset(from), self.offset(lower_bound))
                .map(|offset| self.value_at(offset)),
        }
    }

    fn count_present(&self, values: &TrailedValues, first: i32, last: i32) -> i64 {
        if first > last {
            return 0;
        }

        let range = last as i64 - first as i64 + 1;
        match &self.holes {
            None => range,
            Some(holes) => {
                range - holes.count_removed(values, self.offset(first), self.offset(last))
            }
        }
    }

    pub(crate) fn iter<'a>(&'a self, values: &'a TrailedValues) -> IntegerDomainIterator<'a> {
        IntegerDomainIterator {
            domain: self,
            values,
            next: self.lower_bound(values) as i64,
        }
    }

    pub(crate) fn remove_value(
        &mut self,
        values: &mut TrailedValues,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(values, value) {
            return Ok(false);
        }
        if self.size(values) == 1 {
            return Err(EmptyDomain);
        }

        let lower_bound = self.lower_bound(values);
        let upper_bound = self.upper_bound(values);

        if value == lower_bound {
            let new_lower_bound = self
                .next_present(values, value + 1)
                .expect("the domain has more than one value");
            values.assign(self.lower_bound, new_lower_bound as i64);
        } else if value == upper_bound {
            let new_upper_bound = self
                .previous_present(values, value - 1)
                .expect("the domain has more than one value");
            values.assign(self.upper_bound, new_upper_bound as i64);
        } else {
            if self.holes.is_none() {
                let num_values =
                    self.initial_upper_bound as i64 - self.initial_lower_bound as i64 + 1;
                self.holes = Some(HoleSet::new(values, num_values));
            }
            let offset = self.offset(value);
            if let Some(holes) = &self.holes {
                holes.mark_removed(values, offset);
            }
        }

        values.add_assign(self.size, -1);
        self.debug_check_size(values);
        Ok(true)
    }

    pub(crate) fn set_lower_bound(
        &mut self,
        values: &mut TrailedValues,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = self.lower_bound(values);
        if value <= lower_bound {
            return Ok(false);
        }

        let new_lower_bound = self.next_present(values, value).ok_or(EmptyDomain)?;
        let num_removed = self.count_present(values, lower_bound, new_lower_bound - 1);

        values.assign(self.lower_bound, new_lower_bound as i64);
        values.add_assign(self.size, -num_removed);
        self.debug_check_size(values);
        Ok(true)
    }

    pub(crate) fn set_upper_bound(
        &mut self,
        values: &mut TrailedValues,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let upper_bound = self.upper_bound(values);
        if value >= upper_bound {
            return Ok(false);
        }

        let new_upper_bound = self.previous_present(values, value).ok_or(EmptyDomain)?;
        let num_removed = self.count_present(values, new_upper_bound + 1, upper_bound);

        values.assign(self.upper_bound, new_upper_bound as i64);
        values.add_assign(self.size, -num_removed);
        self.debug_check_size(values);
        Ok(true)
    }

    pub(crate) fn assign(
        &mut self,
        values: &mut TrailedValues,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(values, value) {
            return Err(EmptyDomain);
        }
        if self.size(values) == 1 {
            return Ok(false);
        }

        values.assign(self.lower_bound, value as i64);
        values.assign(self.upper_bound, value as i64);
        values.assign(self.size, 1);
        Ok(true)
    }

    fn debug_check_size(&self, values: &TrailedValues) {
        fdprop_assert_moderate!(
            self.size(values) as i64
                == self.count_present(values, self.lower_bound(values), self.upper_bound(values)),
            "the cached size does not match the domain"
        );
    }
}

/// Iterates the values of a domain in ascending order. Each step looks up the next present
/// value, so creating the iterator does not materialise the domain.
#[derive(Debug)]
pub(crate) struct IntegerDomainIterator<'a> {
    domain: &'a IntegerDomain,
    values: &'a TrailedValues,
    next: i64,
}

impl Iterator for IntegerDomainIterator<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.domain.upper_bound(self.values) as i64 {
            return None;
        }

        let value = self.domain.next_present(self.values, self.next as i32)?;
        self.next = value as i64 + 1;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(domain: &IntegerDomain, values: &TrailedValues) -> Vec<i32> {
        domain.iter(values).collect()
    }

    #[test]
    fn removing_an_interior_value_creates_a_hole() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 1, 5);

        assert_eq!(Ok(true), domain.remove_value(&mut values, 3));

        assert_eq!(vec![1, 2, 4, 5], collect(&domain, &values));
        assert_eq!(4, domain.size(&values));
        assert_eq!(1, domain.lower_bound(&values));
        assert_eq!(5, domain.upper_bound(&values));
    }

    #[test]
    fn removing_the_lower_bound_skips_holes() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 1, 5);

        let _ = domain.remove_value(&mut values, 2).unwrap();
        let _ = domain.remove_value(&mut values, 1).unwrap();

        assert_eq!(3, domain.lower_bound(&values));
        assert_eq!(3, domain.size(&values));
    }

    #[test]
    fn removing_an_absent_value_is_a_no_op() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 1, 5);
        values.new_checkpoint();

        assert_eq!(Ok(false), domain.remove_value(&mut values, 7));
        assert_eq!(0, values.num_trail_entries());
    }

    #[test]
    fn removing_the_last_value_fails_without_changes() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 4, 4);

        assert_eq!(Err(EmptyDomain), domain.remove_value(&mut values, 4));
        assert_eq!(vec![4], collect(&domain, &values));
    }

    #[test]
    fn bound_updates_account_for_holes_in_the_size() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 0, 200);

        for value in [10, 70, 130, 190] {
            let _ = domain.remove_value(&mut values, value).unwrap();
        }

        assert_eq!(Ok(true), domain.set_lower_bound(&mut values, 10));
        assert_eq!(11, domain.lower_bound(&values));
        assert_eq!(187, domain.size(&values));

        assert_eq!(Ok(true), domain.set_upper_bound(&mut values, 190));
        assert_eq!(189, domain.upper_bound(&values));
        assert_eq!(177, domain.size(&values));
    }

    #[test]
    fn bound_update_past_the_other_bound_fails() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 0, 10);

        assert_eq!(Err(EmptyDomain), domain.set_lower_bound(&mut values, 11));
        assert_eq!(Err(EmptyDomain), domain.set_upper_bound(&mut values, -1));
        assert_eq!(11, domain.size(&values));
    }

    #[test]
    fn bound_update_into_trailing_holes_fails() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 0, 10);
        let _ = domain.remove_value(&mut values, 8).unwrap();
        let _ = domain.remove_value(&mut values, 9).unwrap();
        let _ = domain.set_upper_bound(&mut values, 9).unwrap();

        assert_eq!(7, domain.upper_bound(&values));
        assert_eq!(Err(EmptyDomain), domain.set_lower_bound(&mut values, 8));
    }

    #[test]
    fn assigning_an_absent_value_fails() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 0, 10);
        let _ = domain.remove_value(&mut values, 5).unwrap();

        assert_eq!(Err(EmptyDomain), domain.assign(&mut values, 5));
        assert_eq!(Ok(true), domain.assign(&mut values, 6));
        assert_eq!(Ok(false), domain.assign(&mut values, 6));
        assert_eq!(vec![6], collect(&domain, &values));
    }

    #[test]
    fn restoring_a_checkpoint_restores_holes() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, -70, 70);

        values.new_checkpoint();
        let _ = domain.remove_value(&mut values, 0).unwrap();
        let _ = domain.remove_value(&mut values, -65).unwrap();
        let _ = domain.set_upper_bound(&mut values, 3).unwrap();
        let _ = values.synchronise(0);

        assert_eq!(141, domain.size(&values));
        assert!(domain.contains(&values, 0));
        assert!(domain.contains(&values, -65));
        assert_eq!(70, domain.upper_bound(&values));
    }

    #[test]
    fn sparse_domains_survive_restoring_to_before_their_creation() {
        let mut values = TrailedValues::default();
        values.new_checkpoint();
        let domain = IntegerDomain::new_sparse(&mut values, &[-3, 0, 64, 65]);
        let _ = values.synchronise(0);

        assert_eq!(vec![-3, 0, 64, 65], collect(&domain, &values));
        assert_eq!(4, domain.size(&values));
    }

    #[test]
    fn contiguous_sparse_domains_have_no_holes() {
        let mut values = TrailedValues::default();
        let domain = IntegerDomain::new_sparse(&mut values, &[1, 2, 3]);

        assert!(domain.holes.is_none());
    }

    #[test]
    fn next_and_previous_cross_word_boundaries() {
        let mut values = TrailedValues::default();
        let mut domain = IntegerDomain::new(&mut values, 0, 300);
        for value in 1..299 {
            let _ = domain.remove_value(&mut values, value).unwrap();
        }

        assert_eq!(Some(299), domain.next_present(&values, 1));
        assert_eq!(Some(0), domain.previous_present(&values, 298));
        assert_eq!(vec![0, 299, 300], collect(&domain, &values));
    }
}
