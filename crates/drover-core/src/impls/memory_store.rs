//! In-memory task store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{Task, TaskId, TaskState};
use crate::error::DroverError;
use crate::observability::TaskCounts;
use crate::ports::TaskStore;

/// Stored task plus bookkeeping timestamps.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub task: Task,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// In-memory `TaskStore`.
///
/// Saving a task whose stored copy is byte-identical is a no-op (the
/// `updated_at` timestamp does not move), which makes repeated terminal
/// saves observationally idempotent.
#[derive(Default)]
pub struct InMemoryTaskStore {
    records: Arc<Mutex<HashMap<TaskId, TaskRecord>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_record(&self, id: TaskId) -> Option<TaskRecord> {
        self.records.lock().await.get(&id).cloned()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save_task(&self, task: &Task) -> Result<(), DroverError> {
        let mut records = self.records.lock().await;
        match records.get_mut(&task.id) {
            Some(record) => {
                if record.task != *task {
                    record.task = task.clone();
                    record.updated_at = Utc::now();
                }
            }
            None => {
                let now = Utc::now();
                records.insert(
                    task.id,
                    TaskRecord {
                        task: task.clone(),
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        Ok(())
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, DroverError> {
        Ok(self.records.lock().await.get(&id).map(|r| r.task.clone()))
    }

    async fn counts_by_state(&self) -> Result<TaskCounts, DroverError> {
        let records = self.records.lock().await;
        let mut counts = TaskCounts::default();
        for record in records.values() {
            match record.task.state {
                TaskState::Pending => counts.pending += 1,
                TaskState::Running => counts.running += 1,
                TaskState::Finished => counts.finished += 1,
                TaskState::Failed => counts.failed += 1,
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Command;

    fn finished_task() -> Task {
        let mut t = Task::new(TaskId::generate(), vec![Command::new("echo hi")]);
        t.commands[0].state = crate::domain::CommandState::Finished;
        t.commands[0].exit_code = 0;
        t.finish_from_commands();
        t
    }

    #[tokio::test]
    async fn save_and_get() {
        let store = InMemoryTaskStore::new();
        let task = Task::new(TaskId::generate(), vec![Command::new("true")]);
        store.save_task(&task).await.unwrap();

        let back = store.get_task(task.id).await.unwrap().unwrap();
        assert_eq!(back, task);
        assert!(store.get_task(TaskId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn terminal_save_is_idempotent() {
        let store = InMemoryTaskStore::new();
        let task = finished_task();

        store.save_task(&task).await.unwrap();
        let first = store.get_record(task.id).await.unwrap();

        store.save_task(&task).await.unwrap();
        let second = store.get_record(task.id).await.unwrap();

        assert_eq!(first.task, second.task);
        assert_eq!(first.updated_at, second.updated_at);
        assert_eq!(store.counts_by_state().await.unwrap().finished, 1);
    }

    #[tokio::test]
    async fn counts_follow_state_transitions() {
        let store = InMemoryTaskStore::new();
        let mut task = Task::new(TaskId::generate(), vec![Command::new("true")]);

        store.save_task(&task).await.unwrap();
        assert_eq!(store.counts_by_state().await.unwrap().pending, 1);

        task.mark_running();
        store.save_task(&task).await.unwrap();
        let counts = store.counts_by_state().await.unwrap();
        assert_eq!(counts.pending, 0);
        assert_eq!(counts.running, 1);
    }
}
