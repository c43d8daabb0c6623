//! drover-core
//!
//! Scheduling core for a task-execution platform: clients submit jobs
//! composed of tasks, a statically sized pool of workers pulls and executes
//! them through a pluggable execution backend.
//!
//! # Module layout
//! - **domain**: ids, tasks, commands, and the job/task submission specs
//! - **ports**: collaborator seams (`TaskStore`, `ExecutionBackend`)
//! - **scheduler**: intake, allocation planner, dispatch policy, worker pool
//! - **impls**: in-process port implementations (`InMemoryTaskStore`,
//!   `ProcessBackend`)
//! - **allowlist**: explicit worker-identity source
//! - **config** / **error** / **observability**: the usual suspects

pub mod allowlist;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod scheduler;

pub use allowlist::AllowList;
pub use config::SchedulerConfig;
pub use error::DroverError;
pub use scheduler::{Policy, RetrySchedule, Scheduler};
