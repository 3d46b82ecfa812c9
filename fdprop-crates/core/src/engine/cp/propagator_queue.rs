use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use crate::basic_types::Trail;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::fdprop_asserts::fdprop_assert_moderate;
use crate::propagation::ConstraintId;
use crate::propagation::Priority;

/// The constraints waiting to be propagated, one FIFO bucket per [`Priority`].
///
/// Enqueues and dequeues made after a checkpoint are logged, so that restoring the checkpoint
/// brings back exactly the constraints which were waiting when it was created.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<ConstraintId>>,
    is_enqueued: KeyedVec<ConstraintId, bool>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<u32>>,
    changes: Trail<QueueChange>,
}

#[derive(Clone, Copy, Debug)]
enum QueueChange {
    Enqueued(ConstraintId),
    Dequeued { constraint_id: ConstraintId, priority: usize },
}

impl QueueChange {
    fn constraint_id(self) -> ConstraintId {
        match self {
            QueueChange::Enqueued(constraint_id) | QueueChange::Dequeued { constraint_id, .. } => {
                constraint_id
            }
        }
    }
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        Self::new(Priority::NUM_PRIORITIES)
    }
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: u32) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![VecDeque::new(); num_priority_levels as usize],
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
            changes: Trail::default(),
        }
    }

    pub(crate) fn enqueue_constraint(&mut self, constraint_id: ConstraintId, priority: Priority) {
        fdprop_assert_moderate!((priority as usize) < self.queues.len());

        if !self.is_constraint_enqueued(constraint_id) {
            self.push_back(constraint_id, priority as usize);

            if self.changes.get_checkpoint() > 0 {
                self.changes.push(QueueChange::Enqueued(constraint_id));
            }
        }
    }

    fn push_back(&mut self, constraint_id: ConstraintId, priority: usize) {
        self.is_enqueued.accomodate(constraint_id, false);
        self.is_enqueued[constraint_id] = true;
        self.num_enqueued += 1;

        if self.queues[priority].is_empty() {
            self.present_priorities.push(Reverse(priority as u32));
        }
        self.queues[priority].push_back(constraint_id);
    }

    /// Removes the first constraint of the highest priority bucket which is not empty.
    pub(crate) fn pop(&mut self) -> Option<ConstraintId> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        fdprop_assert_moderate!(!self.queues[top_priority].is_empty());

        let next_constraint_id = self.queues[top_priority].pop_front();

        if let Some(constraint_id) = next_constraint_id {
            self.is_enqueued[constraint_id] = false;
            self.num_enqueued -= 1;

            if self.queues[top_priority].is_empty() {
                let _ = self.present_priorities.pop();
            }

            if self.changes.get_checkpoint() > 0 {
                self.changes.push(QueueChange::Dequeued {
                    constraint_id,
                    priority: top_priority,
                });
            }
        }

        next_constraint_id
    }

    pub(crate) fn is_constraint_enqueued(&self, constraint_id: ConstraintId) -> bool {
        self.is_enqueued
            .get(constraint_id)
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.changes.new_checkpoint();
    }

    /// Restores the queue to its content at the given checkpoint: constraints enqueued since are
    /// discarded and constraints dequeued since are enqueued again.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        // Most recent change first.
        let changes: Vec<QueueChange> = self.changes.synchronise(new_checkpoint).collect();
        if changes.is_empty() {
            return;
        }

        for change in &changes {
            let is_enqueued = &mut self.is_enqueued[change.constraint_id()];
            if *is_enqueued {
                *is_enqueued = false;
                self.num_enqueued -= 1;
            }
        }

        let is_enqueued = &self.is_enqueued;
        for queue in self.queues.iter_mut() {
            queue.retain(|&constraint_id| is_enqueued[constraint_id]);
        }
        self.present_priorities = self
            .queues
            .iter()
            .enumerate()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(priority, _)| Reverse(priority as u32))
            .collect();

        // The earliest change of a constraint tells whether it was waiting at the checkpoint.
        let mut seen: HashSet<ConstraintId> = HashSet::default();
        for &change in changes.iter().rev() {
            if !seen.insert(change.constraint_id()) {
                continue;
            }

            if let QueueChange::Dequeued {
                constraint_id,
                priority,
            } = change
            {
                self.push_back(constraint_id, priority);
            }
        }
    }
}
