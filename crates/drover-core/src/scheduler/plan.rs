//! Allocation plans: committed scheduling decisions and their execution.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::{Task, TaskId, WorkerId};
use crate::error::DroverError;
use crate::ports::{ExecutionBackend, TaskStore};
use crate::scheduler::pool::SharedPool;

/// Everything plan execution needs, bundled so the dispatcher can hand a
/// clone to each spawned execution.
#[derive(Clone)]
pub(crate) struct ExecContext {
    pub pool: SharedPool,
    pub store: Arc<dyn TaskStore>,
    pub backend: Arc<dyn ExecutionBackend>,
}

/// An immutable committed decision: this task runs on this worker.
///
/// Created by the planner once a match is found, consumed exactly once by
/// the policy dispatcher. Never retried at the plan level; if execution
/// fails, failure lands on the task record.
pub struct AllocationPlan {
    task: Task,
    worker_id: WorkerId,
}

impl AllocationPlan {
    pub(crate) fn new(task: Task, worker_id: WorkerId) -> Self {
        Self { task, worker_id }
    }

    pub fn task_id(&self) -> TaskId {
        self.task.id
    }

    pub fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    /// Drive the task through the worker: the only way a committed task
    /// reaches a terminal state.
    ///
    /// Steps, each a visible side effect:
    /// 1. worker -> `Working`
    /// 2. task -> `Running`, persisted
    /// 3. backend invoked, synchronously from this tokio task
    /// 4. terminal state persisted
    /// 5. worker -> `Sleeping`
    ///
    /// The worker is released on every path; there is no early return
    /// between steps 1 and 5.
    pub(crate) async fn execute(self, ctx: &ExecContext) -> Result<(), DroverError> {
        let AllocationPlan { mut task, worker_id } = self;

        ctx.pool.lock().await.begin_work(worker_id);

        task.mark_running();
        if let Err(e) = ctx.store.save_task(&task).await {
            // Surfaced, not swallowed. Execution still proceeds so the task
            // is not lost to a transient store outage.
            error!(
                task_id = %task.id,
                %worker_id,
                state = ?task.state,
                error = %e,
                "could not persist running state"
            );
        }

        if let Err(e) = ctx.backend.execute(&mut task).await {
            // Backend fault is task-local: record it, do not escalate.
            warn!(task_id = %task.id, %worker_id, error = %e, "backend error recorded on task");
            if !task.state.is_terminal() {
                task.mark_failed();
            }
        }

        let saved = ctx.store.save_task(&task).await;

        ctx.pool.lock().await.release(worker_id);

        saved.map_err(|e| DroverError::Persistence {
            task_id: task.id,
            worker_id,
            state: task.state,
            message: e.to_string(),
        })
    }
}
