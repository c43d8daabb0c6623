use async_trait::async_trait;

use crate::domain::{Task, TaskId};
use crate::error::DroverError;
use crate::observability::TaskCounts;

/// Storage port: the durable record of task state.
///
/// The scheduler persists each executed task at least twice (on the
/// transition to `Running`, and on the terminal state). Saving the same
/// terminal state twice must be observationally idempotent.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn save_task(&self, task: &Task) -> Result<(), DroverError>;

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, DroverError>;

    async fn counts_by_state(&self) -> Result<TaskCounts, DroverError>;
}
