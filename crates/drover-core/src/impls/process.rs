//! Local process execution backend.
//!
//! Runs each command uninsulated on the host through the shell, in order,
//! stopping at the first non-zero exit. This is the "run it on the box"
//! backend; anything needing isolation belongs in a different
//! `ExecutionBackend` implementation.

use async_trait::async_trait;
use tokio::process::Command as OsCommand;
use tracing::debug;

use crate::domain::{CommandState, EXIT_CODE_UNSET, Task};
use crate::error::DroverError;
use crate::ports::ExecutionBackend;

pub struct ProcessBackend {
    shell: String,
}

impl ProcessBackend {
    pub fn new() -> Self {
        Self {
            shell: "sh".to_string(),
        }
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ProcessBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutionBackend for ProcessBackend {
    async fn execute(&self, task: &mut Task) -> Result<(), DroverError> {
        for i in 0..task.commands.len() {
            task.commands[i].state = CommandState::Running;
            let raw = task.commands[i].raw.clone();
            debug!(task_id = %task.id, command = %raw, "running command");

            let status = OsCommand::new(&self.shell)
                .arg("-c")
                .arg(&raw)
                .status()
                .await;

            let status = match status {
                Ok(status) => status,
                Err(e) => {
                    // Could not even spawn the shell: leave the command with
                    // the sentinel exit code and record the failure.
                    task.commands[i].state = CommandState::Finished;
                    task.mark_failed();
                    return Err(DroverError::Backend(format!(
                        "spawn `{raw}` via {}: {e}",
                        self.shell
                    )));
                }
            };

            // Killed by signal leaves no exit code; keep the sentinel, which
            // counts as failure.
            let code = status.code().unwrap_or(EXIT_CODE_UNSET);
            task.commands[i].exit_code = code;
            task.commands[i].state = CommandState::Finished;

            if code != 0 {
                // Later commands stay NotStarted.
                break;
            }
        }

        task.finish_from_commands();
        Ok(())
    }
}
