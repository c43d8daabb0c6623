//! Submission surface: job and task specs as accepted from clients.
//!
//! Field names serialize in PascalCase to match the platform's existing JSON
//! wire shape (`{"Label": ..., "Tasks": [{"Commands": [...]}]}`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Command, Task, TaskId};

/// A job as submitted by a client: a label plus the tasks it is composed of.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobSpec {
    pub label: String,
    pub tasks: Vec<TaskSpec>,
}

/// One task of a job spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskSpec {
    pub commands: Vec<String>,

    #[serde(default)]
    pub config: HashMap<String, String>,

    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl JobSpec {
    /// Expand the spec into schedulable tasks with fresh ids.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
            .into_iter()
            .map(|spec| {
                let commands = spec.commands.into_iter().map(Command::new).collect();
                Task::new(TaskId::generate(), commands)
                    .with_config(spec.config)
                    .with_metadata(spec.metadata)
            })
            .collect()
    }
}
