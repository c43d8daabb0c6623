//! Dispatch policy: how committed plans become concurrent execution.
//!
//! A closed set of variants selected at scheduler construction time; adding
//! a variant (bounded concurrency, priority ordering) never touches the
//! planner or the worker contract.

use std::fmt;

use tokio::sync::mpsc;
use tracing::error;

use super::plan::{AllocationPlan, ExecContext};

/// Dispatch strategy over the stream of committed plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Every plan is dispatched on its own tokio task immediately upon
    /// receipt, no concurrency cap. Execution concurrency is bounded only
    /// by how many workers are reserved, not by the dispatcher. FIFO over
    /// plans, not over raw task submissions.
    #[default]
    Fifo,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fifo => write!(f, "fifo"),
        }
    }
}

impl Policy {
    /// Consume the plan stream until it closes. Runs as the scheduler's
    /// dispatch loop.
    pub(crate) async fn run_dispatch(
        self,
        mut plans: mpsc::Receiver<AllocationPlan>,
        ctx: ExecContext,
    ) {
        match self {
            Policy::Fifo => {
                while let Some(plan) = plans.recv().await {
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        let task_id = plan.task_id();
                        let worker_id = plan.worker_id();
                        if let Err(e) = plan.execute(&ctx).await {
                            error!(%task_id, %worker_id, error = %e, "plan execution error");
                        }
                    });
                }
            }
        }
    }
}
