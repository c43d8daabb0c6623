//! Ports: trait seams toward external collaborators.
//!
//! The scheduler core treats storage and command execution as opaque
//! capabilities. These traits are the swap points for real implementations
//! (a database-backed store, a remote agent backend); `crate::impls` ships
//! the in-process ones.

mod backend;
mod store;

pub use backend::ExecutionBackend;
pub use store::TaskStore;
