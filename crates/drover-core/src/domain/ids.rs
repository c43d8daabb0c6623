//! Strongly-typed identifiers.
//!
//! ULID-based ids behind a phantom-typed generic, so `TaskId`, `JobId` and
//! `WorkerId` share one implementation but cannot be mixed up at compile
//! time. ULIDs sort by creation time and can be generated without
//! coordination, which matters once worker identities come from an external
//! source instead of this process.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for id types. Provides the `Display` prefix.
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic id. `T` is a zero-sized marker that only exists at compile time.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Generate a fresh id.
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// Parse a bare ULID string (as found in an allowlist file).
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self::from_ulid(Ulid::from_string(s)?))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobMarker;

impl IdMarker for JobMarker {
    fn prefix() -> &'static str {
        "job-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskMarker;

impl IdMarker for TaskMarker {
    fn prefix() -> &'static str {
        "task-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkerMarker;

impl IdMarker for WorkerMarker {
    fn prefix() -> &'static str {
        "worker-"
    }
}

pub type JobId = Id<JobMarker>;
pub type TaskId = Id<TaskMarker>;
pub type WorkerId = Id<WorkerMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix() {
        let id = TaskId::generate();
        assert!(id.to_string().starts_with("task-"));

        let id = WorkerId::generate();
        assert!(id.to_string().starts_with("worker-"));
    }

    #[test]
    fn parse_roundtrip() {
        let id = WorkerId::generate();
        let bare = id.as_ulid().to_string();
        let back = WorkerId::parse(&bare).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(WorkerId::parse("not-a-ulid").is_err());
    }
}
