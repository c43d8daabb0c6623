use async_trait::async_trait;

use crate::domain::Task;
use crate::error::DroverError;

/// Execution backend port: the concrete mechanism that runs a task's
/// commands.
///
/// Contract:
/// - The call is synchronous from the worker's perspective; it returns once
///   the task has run to completion. No cancellation, no timeout; those are
///   backend concerns.
/// - Command outcomes (states, exit codes) and the task's terminal state are
///   recorded on `task` by the backend. A non-zero exit is not an `Err`.
/// - `Err` means the backend itself failed (could not spawn, agent
///   unreachable). The worker records that on the task; it is never a
///   scheduler-level fault.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    async fn execute(&self, task: &mut Task) -> Result<(), DroverError>;
}
