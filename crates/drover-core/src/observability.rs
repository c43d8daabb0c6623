//! Status views over tasks and the worker pool.

use serde::{Deserialize, Serialize};

/// Per-state task counts, as reported by a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub pending: usize,
    pub running: usize,
    pub finished: usize,
    pub failed: usize,
}

impl TaskCounts {
    pub fn terminal(&self) -> usize {
        self.finished + self.failed
    }
}

/// Per-state worker counts for the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCounts {
    pub sleeping: usize,
    pub busy: usize,
    pub working: usize,
}
