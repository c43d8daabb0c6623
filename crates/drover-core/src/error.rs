use thiserror::Error;

use crate::domain::{TaskId, TaskState, WorkerId};

#[derive(Debug, Error)]
pub enum DroverError {
    /// Fatal at startup: the scheduler must not start with an ill-defined
    /// pool or retry schedule.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The intake channel is closed; the task was not accepted.
    #[error("scheduler stopped, task {0} not accepted")]
    SchedulerStopped(TaskId),

    /// Raw storage failure, as reported by the store implementation.
    #[error("store: {0}")]
    Store(String),

    /// A task-state transition could not be persisted. Operational and
    /// retryable, distinct from task-level failure; carries enough context
    /// to diagnose data loss.
    #[error("failed to persist task {task_id} in state {state:?} (worker {worker_id}): {message}")]
    Persistence {
        task_id: TaskId,
        worker_id: WorkerId,
        state: TaskState,
        message: String,
    },

    /// The execution backend itself errored (as opposed to a command merely
    /// exiting non-zero, which is recorded on the command).
    #[error("backend: {0}")]
    Backend(String),
}
