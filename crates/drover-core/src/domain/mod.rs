//! Domain model: identifiers, tasks, commands, and the submission surface.

mod ids;
mod spec;
mod task;

pub use ids::{Id, IdMarker, JobId, TaskId, WorkerId};
pub use spec::{JobSpec, TaskSpec};
pub use task::{Command, CommandState, EXIT_CODE_UNSET, Task, TaskState};
