//! Single-node demo: schedule a job against a local process backend.
//!
//! Pool size comes from `DROVER_POOL_SIZE` (default 2 here). Tasks run
//! uninsulated on the host through `sh -c`.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::info;

use drover_core::config::POOL_SIZE_ENV;
use drover_core::domain::JobSpec;
use drover_core::impls::{InMemoryTaskStore, ProcessBackend};
use drover_core::ports::TaskStore;
use drover_core::{DroverError, Policy, Scheduler, SchedulerConfig};

#[tokio::main]
async fn main() -> Result<(), DroverError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = if std::env::var(POOL_SIZE_ENV).is_ok() {
        SchedulerConfig::from_env()?
    } else {
        SchedulerConfig::new(2)
    };

    let store = Arc::new(InMemoryTaskStore::new());
    let scheduler = Scheduler::start(
        config,
        Policy::Fifo,
        store.clone(),
        Arc::new(ProcessBackend::new()),
    )?;

    // A small job: two tasks, the second one fails on its middle command.
    let spec: JobSpec = serde_json::from_value(serde_json::json!({
        "Label": "demo",
        "Tasks": [
            {"Commands": ["echo hello from drover", "true"]},
            {"Commands": ["true", "exit 3", "echo never runs"]}
        ]
    }))
    .expect("demo job spec is well-formed");

    let tasks = spec.into_tasks();
    let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
    for task in tasks {
        info!(task_id = %task.id, "submitting task");
        scheduler.add_task(task).await?;
    }

    // Poll the store until every task lands in a terminal state.
    loop {
        let counts = store.counts_by_state().await?;
        if counts.terminal() == ids.len() {
            break;
        }
        sleep(Duration::from_millis(50)).await;
    }

    for id in ids {
        let task = store.get_task(id).await?.expect("executed task is stored");
        info!(task_id = %id, state = ?task.state, "task done");
        for command in &task.commands {
            info!(
                raw = %command.raw,
                state = ?command.state,
                exit_code = command.exit_code,
                "  command"
            );
        }
    }

    scheduler.shutdown_and_join().await;
    Ok(())
}
