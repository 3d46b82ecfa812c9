use crate::containers::StorageKey;

/// A handle to a reversible integer cell owned by the [`Store`](crate::Store).
///
/// Writes to the cell are undone when the store pops back past the choice point at which they
/// were made. Constraints use these cells for incremental state, such as counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrailedInteger {
    id: u32,
}

impl StorageKey for TrailedInteger {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        Self { id: index as u32 }
    }
}
