//! Scheduler: pending-task intake, allocation planning, policy dispatch.
//!
//! Data flow: `add_task` -> intake channel -> planning loop (matches the
//! task to an idle worker or re-submits it after a delay) -> plan channel ->
//! policy dispatch -> worker execution -> worker idle again.

mod plan;
mod policy;
mod pool;
mod retry;

pub use plan::AllocationPlan;
pub use policy::Policy;
pub use pool::{SharedPool, Worker, WorkerPool, WorkerState};
pub use retry::RetrySchedule;

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use crate::domain::{Task, WorkerId};
use crate::error::DroverError;
use crate::observability::PoolCounts;
use crate::ports::{ExecutionBackend, TaskStore};

use plan::ExecContext;

/// A task in the intake, with the number of planning passes that already
/// failed to match it.
struct PendingTask {
    task: Task,
    attempts: u32,
}

/// Running scheduler handle.
///
/// `start` consumes its inputs and every call builds an independent
/// instance, so "start exactly once" holds by construction. Dropping the
/// handle (or calling `shutdown_and_join`) stops intake and planning; it
/// does not cancel in-flight executions.
pub struct Scheduler {
    task_tx: mpsc::Sender<PendingTask>,
    pool: SharedPool,
    shutdown_tx: watch::Sender<bool>,
    joins: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Provision a pool with generated worker identities and begin
    /// scheduling.
    pub fn start(
        config: SchedulerConfig,
        policy: Policy,
        store: Arc<dyn TaskStore>,
        backend: Arc<dyn ExecutionBackend>,
    ) -> Result<Self, DroverError> {
        let identities = (0..config.pool_size).map(|_| WorkerId::generate()).collect();
        Self::start_with_identities(config, policy, store, backend, identities)
    }

    /// Like [`Scheduler::start`], but with externally assigned worker
    /// identities (e.g. drawn from an [`crate::allowlist::AllowList`]).
    pub fn start_with_identities(
        config: SchedulerConfig,
        policy: Policy,
        store: Arc<dyn TaskStore>,
        backend: Arc<dyn ExecutionBackend>,
        identities: Vec<WorkerId>,
    ) -> Result<Self, DroverError> {
        if identities.len() != config.pool_size {
            return Err(DroverError::Config(format!(
                "pool size is {} but {} worker identities were provided",
                config.pool_size,
                identities.len()
            )));
        }

        info!(pool_size = config.pool_size, %policy, "starting scheduler");
        if config.pool_size == 0 {
            warn!("pool size is 0: no task will ever be matched");
        }

        let pool: SharedPool = Arc::new(Mutex::new(WorkerPool::provision(identities)));

        // Capacity-1 channels: the intake is the system's only built-in
        // backpressure point, so submitters stall instead of backlog
        // accumulating in memory.
        let (task_tx, task_rx) = mpsc::channel(1);
        let (plan_tx, plan_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let ctx = ExecContext {
            pool: Arc::clone(&pool),
            store: Arc::clone(&store),
            backend,
        };

        let planner = tokio::spawn(planning_loop(
            task_rx,
            task_tx.clone(),
            plan_tx,
            Arc::clone(&pool),
            store,
            config.retry,
            shutdown_rx,
        ));
        let dispatcher = tokio::spawn(policy.run_dispatch(plan_rx, ctx));

        Ok(Self {
            task_tx,
            pool,
            shutdown_tx,
            joins: vec![planner, dispatcher],
        })
    }

    /// Hand one task to the scheduler. Accepted exactly once; awaits until
    /// the planning loop is ready to receive (backpressure).
    pub async fn add_task(&self, task: Task) -> Result<(), DroverError> {
        let task_id = task.id;
        self.task_tx
            .send(PendingTask { task, attempts: 0 })
            .await
            .map_err(|_| DroverError::SchedulerStopped(task_id))
    }

    pub async fn pool_counts(&self) -> PoolCounts {
        self.pool.lock().await.counts()
    }

    /// Request shutdown; intake closes once the planning loop exits.
    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Shutdown and wait for the planning and dispatch loops. In-flight
    /// executions run to completion on their own tokio tasks.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        drop(self.task_tx);
        for join in self.joins {
            let _ = join.await;
        }
    }
}

/// Planning loop: pull the next pending task, match it against the pool,
/// commit a plan or schedule a re-submission.
async fn planning_loop(
    mut task_rx: mpsc::Receiver<PendingTask>,
    retry_tx: mpsc::Sender<PendingTask>,
    plan_tx: mpsc::Sender<AllocationPlan>,
    pool: SharedPool,
    store: Arc<dyn TaskStore>,
    retry: RetrySchedule,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let pending = tokio::select! {
            changed = shutdown_rx.changed() => {
                // Err means the handle (and its shutdown sender) is gone;
                // the planner must not outlive it. The loop holds a retry
                // sender on its own intake, so recv() alone never closes.
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
                continue;
            }
            pending = task_rx.recv() => match pending {
                Some(pending) => pending,
                None => break,
            },
        };

        debug!(task_id = %pending.task.id, attempts = pending.attempts, "planning task");

        // Scan-and-reserve is one lexical lock scope: read states, pick the
        // first idle worker, mark it Busy. The guard drops on every exit
        // path, match found or not, before anything below can await.
        let reserved = { pool.lock().await.reserve_first_idle() };

        match reserved {
            Some(worker_id) => {
                info!(task_id = %pending.task.id, %worker_id, "task matched");
                if plan_tx
                    .send(AllocationPlan::new(pending.task, worker_id))
                    .await
                    .is_err()
                {
                    warn!(%worker_id, "dispatcher gone, dropping committed plan");
                    break;
                }
            }
            None if retry.allows(pending.attempts) => {
                let delay = retry.delay();
                debug!(
                    task_id = %pending.task.id,
                    delay_ms = delay.as_millis() as u64,
                    "no idle worker, scheduling re-submission"
                );

                // Ephemeral timer task so the planning loop itself never
                // blocks on a retry wait.
                let retry_tx = retry_tx.clone();
                let attempts = pending.attempts + 1;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let task_id = pending.task.id;
                    match retry_tx
                        .send(PendingTask {
                            task: pending.task,
                            attempts,
                        })
                        .await
                    {
                        Ok(()) => info!(%task_id, attempts, "retrying task"),
                        Err(_) => debug!(%task_id, "scheduler stopped, dropping retry"),
                    }
                });
            }
            None => {
                // Bounded schedule exhausted: fail the task instead of
                // circling forever.
                warn!(
                    task_id = %pending.task.id,
                    attempts = pending.attempts,
                    "no idle worker and retry budget exhausted, failing task"
                );
                let mut task = pending.task;
                task.mark_failed();
                if let Err(e) = store.save_task(&task).await {
                    error!(task_id = %task.id, error = %e, "could not persist failed state");
                }
            }
        }
    }
}
