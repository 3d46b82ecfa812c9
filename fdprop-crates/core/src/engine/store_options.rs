use crate::basic_types::PropagationStrength;

/// Options which influence how the [`Store`](crate::Store) schedules constraints.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// When `true`, a constraint which declares itself idempotent is not enqueued because of
    /// changes it made itself. When `false`, the hint is ignored.
    pub respect_idempotence: bool,
    /// The strength used by [`Store::post_default`](crate::Store::post_default).
    pub default_strength: PropagationStrength,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            respect_idempotence: true,
            default_strength: PropagationStrength::Strong,
        }
    }
}

impl StoreOptions {
    pub fn with_respect_idempotence(mut self, respect_idempotence: bool) -> Self {
        self.respect_idempotence = respect_idempotence;
        self
    }

    pub fn with_default_strength(mut self, default_strength: PropagationStrength) -> Self {
        self.default_strength = default_strength;
        self
    }
}
