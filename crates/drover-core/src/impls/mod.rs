//! In-process implementations of the ports, for tests and single-node use.

mod memory_store;
mod process;

pub use memory_store::InMemoryTaskStore;
pub use process::ProcessBackend;
