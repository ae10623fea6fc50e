//! Stage queue: pending and in-flight work for one pipeline stage.
//!
//! A stage holds its waiting items in FIFO order and tracks the ids of
//! items currently executing on a worker. An item is in exactly one state
//! at a time: it leaves `pending` the moment it is handed to a worker and
//! its id is recorded in-flight until the completion handler removes it.
//!
//! The queue performs no locking itself; all structural mutation happens
//! under the caller-held pipeline lock.

use std::collections::VecDeque;

/// Identity of a pipeline item, stable across the download and extract
/// stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// FIFO queue of pending items plus the set of in-flight item ids.
#[derive(Debug)]
pub struct StageQueue<T> {
    pending: VecDeque<T>,
    in_flight: Vec<TaskId>,
}

impl<T> StageQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            in_flight: Vec::new(),
        }
    }

    /// Appends an item to the back of the pending queue.
    pub fn enqueue_pending(&mut self, item: T) {
        self.pending.push_back(item);
    }

    /// Removes and returns the oldest pending item.
    pub fn take_pending(&mut self) -> Option<T> {
        self.pending.pop_front()
    }

    /// Records an item as executing on a worker.
    pub fn mark_in_flight(&mut self, id: TaskId) {
        debug_assert!(!self.in_flight.contains(&id));
        self.in_flight.push(id);
    }

    /// Removes an item from the in-flight set. Returns false if the id was
    /// not in flight (already removed or never dispatched).
    pub fn remove_in_flight(&mut self, id: TaskId) -> bool {
        match self.in_flight.iter().position(|&i| i == id) {
            Some(pos) => {
                self.in_flight.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drops all pending items. Used when a stop is issued.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn pending_is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn in_flight_is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }
}

impl<T> Default for StageQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
