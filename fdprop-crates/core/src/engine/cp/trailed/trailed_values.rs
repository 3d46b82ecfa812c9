use super::TrailedChange;
use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// Stamp of a cell which has never been written since its creation.
const UNSTAMPED: u64 = 0;

/// The global undo log for every reversible cell.
///
/// Each cell remembers the magic value that was current when its old value was last recorded.
/// The magic value advances whenever a checkpoint is created or restored, so a cell is recorded
/// at most once between two such operations regardless of how often it is written.
#[derive(Debug, Clone)]
pub(crate) struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
    stamps: KeyedVec<TrailedInteger, u64>,
    magic: u64,
}

impl Default for TrailedValues {
    fn default() -> Self {
        Self {
            trail: Trail::default(),
            values: KeyedVec::default(),
            stamps: KeyedVec::default(),
            magic: UNSTAMPED + 1,
        }
    }
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        let _ = self.stamps.push(UNSTAMPED);
        self.values.push(initial_value)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.magic += 1;
        self.trail.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    /// Restores every cell to the value it had when `new_checkpoint` was created. Returns the
    /// number of trail entries that were undone.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> usize {
        self.magic += 1;

        let mut num_restored = 0;
        for state_change in self.trail.synchronise(new_checkpoint) {
            self.values[state_change.reference] = state_change.old_value;
            num_restored += 1;
        }
        num_restored
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }

        // Nothing has to be recorded for writes before the first checkpoint.
        if self.trail.get_checkpoint() > 0 && self.stamps[trailed_integer] != self.magic {
            self.stamps[trailed_integer] = self.magic;
            self.trail.push(TrailedChange {
                old_value,
                reference: trailed_integer,
            });
        }

        self.values[trailed_integer] = value;
    }

    pub(crate) fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.assign(trailed_integer, self.values[trailed_integer] + addition);
    }

    #[cfg(test)]
    pub(crate) fn num_trail_entries(&self) -> usize {
        self.trail.len()
    }
}
