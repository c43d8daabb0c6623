//! Task and command model.
//!
//! A task is the unit of schedulable work: an ordered sequence of commands
//! plus opaque config the execution backend may consult. The scheduler only
//! reads/writes the state fields; command text and config pass through
//! untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TaskId;

/// Exit code sentinel for a command that has not produced one yet.
pub const EXIT_CODE_UNSET: i32 = -1;

/// Task lifecycle state.
///
/// Transitions:
/// - `Pending -> Running` the instant a worker starts driving the task
/// - `Running -> Finished | Failed` when the backend returns
///
/// A task is never reused across workers, so there is no path back out of a
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Running,
    Finished,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Finished | TaskState::Failed)
    }
}

/// Command execution state. Failure is carried by the exit code, not the
/// state: a command that ran and exited non-zero is still `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandState {
    NotStarted,
    Running,
    Finished,
}

/// One command of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub raw: String,
    pub state: CommandState,
    pub exit_code: i32,
}

impl Command {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            state: CommandState::NotStarted,
            exit_code: EXIT_CODE_UNSET,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.state == CommandState::Finished && self.exit_code == 0
    }
}

/// Unit of schedulable work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub state: TaskState,
    pub commands: Vec<Command>,

    /// Opaque key-value attributes for the backend (resource hints etc).
    /// Not interpreted by the scheduler.
    #[serde(default)]
    pub config: HashMap<String, String>,

    /// Client-supplied annotations, stored with the task and otherwise
    /// untouched.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Task {
    pub fn new(id: TaskId, commands: Vec<Command>) -> Self {
        Self {
            id,
            state: TaskState::Pending,
            commands,
            config: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_config(mut self, config: HashMap<String, String>) -> Self {
        self.config = config;
        self
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn mark_running(&mut self) {
        self.state = TaskState::Running;
    }

    pub fn mark_failed(&mut self) {
        self.state = TaskState::Failed;
    }

    /// Derive the terminal state from the command records: `Finished` only
    /// if every command ran and exited zero.
    pub fn finish_from_commands(&mut self) {
        if self.commands.iter().all(Command::succeeded) {
            self.state = TaskState::Finished;
        } else {
            self.state = TaskState::Failed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(commands: &[&str]) -> Task {
        Task::new(
            TaskId::generate(),
            commands.iter().copied().map(Command::new).collect(),
        )
    }

    #[test]
    fn new_task_is_pending_with_unset_exit_codes() {
        let t = task(&["echo a", "echo b"]);
        assert_eq!(t.state, TaskState::Pending);
        for c in &t.commands {
            assert_eq!(c.state, CommandState::NotStarted);
            assert_eq!(c.exit_code, EXIT_CODE_UNSET);
        }
    }

    #[test]
    fn finish_from_commands_requires_all_zero_exits() {
        let mut t = task(&["a", "b"]);
        for c in &mut t.commands {
            c.state = CommandState::Finished;
            c.exit_code = 0;
        }
        t.finish_from_commands();
        assert_eq!(t.state, TaskState::Finished);

        let mut t = task(&["a", "b"]);
        t.commands[0].state = CommandState::Finished;
        t.commands[0].exit_code = 0;
        t.commands[1].state = CommandState::Finished;
        t.commands[1].exit_code = 3;
        t.finish_from_commands();
        assert_eq!(t.state, TaskState::Failed);
        // the successful command keeps its own record
        assert!(t.commands[0].succeeded());
    }

    #[test]
    fn unrun_command_counts_as_failure() {
        let mut t = task(&["a", "b"]);
        t.commands[0].state = CommandState::Finished;
        t.commands[0].exit_code = 0;
        // commands[1] never started
        t.finish_from_commands();
        assert_eq!(t.state, TaskState::Failed);
    }

    #[test]
    fn terminal_states() {
        assert!(!TaskState::Pending.is_terminal());
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Finished.is_terminal());
        assert!(TaskState::Failed.is_terminal());
    }
}
