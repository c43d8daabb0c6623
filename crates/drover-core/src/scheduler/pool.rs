//! Worker pool: the one shared resource requiring exclusive access.
//!
//! Every read or write of a worker's availability during scan-and-reserve
//! goes through `WorkerPool` under a single lock guard. The pool is sized
//! once at startup; workers are never destroyed.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::WorkerId;
use crate::observability::PoolCounts;

/// Worker availability state.
///
/// `Sleeping -> Busy -> Working -> Sleeping`, repeating. `Busy` and
/// `Working` are both unavailable but are set at different points: `Busy`
/// the instant the planner commits a match, `Working` once execution
/// actually starts. The gap keeps a second planning pass from matching the
/// same worker before its execution begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    Sleeping,
    Busy,
    Working,
}

/// A schedulable execution slot.
#[derive(Debug, Clone)]
pub struct Worker {
    id: WorkerId,
    state: WorkerState,
}

impl Worker {
    pub fn new(id: WorkerId) -> Self {
        Self {
            id,
            state: WorkerState::Sleeping,
        }
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Availability predicate used by the planner's first-fit scan.
    pub fn is_idle(&self) -> bool {
        self.state == WorkerState::Sleeping
    }
}

/// Statically sized pool, scanned in registration order.
pub struct WorkerPool {
    workers: Vec<Worker>,
}

pub type SharedPool = Arc<Mutex<WorkerPool>>;

impl WorkerPool {
    pub fn provision(ids: Vec<WorkerId>) -> Self {
        Self {
            workers: ids.into_iter().map(Worker::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// First-fit scan: reserve the first idle worker, flipping it to `Busy`.
    /// No scoring, no affinity. Caller must hold the pool lock for the whole
    /// scan-and-reserve; the signature (`&mut self`) enforces that.
    pub fn reserve_first_idle(&mut self) -> Option<WorkerId> {
        let worker = self.workers.iter_mut().find(|w| w.is_idle())?;
        worker.state = WorkerState::Busy;
        Some(worker.id)
    }

    /// `Busy -> Working`, the instant the worker starts driving the backend.
    pub fn begin_work(&mut self, id: WorkerId) {
        self.transition(id, WorkerState::Busy, WorkerState::Working);
    }

    /// Back to `Sleeping`, eligible for the next planning pass.
    pub fn release(&mut self, id: WorkerId) {
        self.transition(id, WorkerState::Working, WorkerState::Sleeping);
    }

    fn transition(&mut self, id: WorkerId, expected: WorkerState, next: WorkerState) {
        match self.workers.iter_mut().find(|w| w.id == id) {
            Some(worker) => {
                if worker.state != expected {
                    warn!(
                        worker_id = %id,
                        state = ?worker.state,
                        expected = ?expected,
                        "unexpected worker state transition"
                    );
                }
                worker.state = next;
            }
            None => warn!(worker_id = %id, "transition for unknown worker"),
        }
    }

    pub fn counts(&self) -> PoolCounts {
        let mut counts = PoolCounts::default();
        for worker in &self.workers {
            match worker.state {
                WorkerState::Sleeping => counts.sleeping += 1,
                WorkerState::Busy => counts.busy += 1,
                WorkerState::Working => counts.working += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> WorkerPool {
        WorkerPool::provision((0..n).map(|_| WorkerId::generate()).collect())
    }

    #[test]
    fn reserve_is_first_fit_in_registration_order() {
        let ids: Vec<WorkerId> = (0..3).map(|_| WorkerId::generate()).collect();
        let mut pool = WorkerPool::provision(ids.clone());

        assert_eq!(pool.reserve_first_idle(), Some(ids[0]));
        assert_eq!(pool.reserve_first_idle(), Some(ids[1]));
        assert_eq!(pool.reserve_first_idle(), Some(ids[2]));
        assert_eq!(pool.reserve_first_idle(), None);
    }

    #[test]
    fn reserved_worker_is_not_matched_twice() {
        let mut pool = pool(1);
        let id = pool.reserve_first_idle().unwrap();

        // still reserved: Busy and Working are both unavailable
        assert_eq!(pool.reserve_first_idle(), None);
        pool.begin_work(id);
        assert_eq!(pool.reserve_first_idle(), None);

        pool.release(id);
        assert_eq!(pool.reserve_first_idle(), Some(id));
    }

    #[test]
    fn full_cycle_follows_the_state_machine() {
        let mut pool = pool(1);

        for _ in 0..3 {
            assert_eq!(pool.counts().sleeping, 1);
            let id = pool.reserve_first_idle().unwrap();
            assert_eq!(pool.counts().busy, 1);
            pool.begin_work(id);
            assert_eq!(pool.counts().working, 1);
            pool.release(id);
        }
        assert_eq!(pool.counts().sleeping, 1);
    }

    #[test]
    fn empty_pool_never_matches() {
        let mut pool = pool(0);
        assert!(pool.is_empty());
        assert_eq!(pool.reserve_first_idle(), None);
    }
}
