//! Worker-identity allowlist.
//!
//! Loaded once from a configuration source and passed as an explicit
//! dependency into whichever component assigns or validates worker
//! identities, never process-wide mutable state. The scheduler draws pool
//! identities from it via [`AllowList::take`].

use std::path::Path;

use tracing::info;

use crate::domain::WorkerId;
use crate::error::DroverError;

/// An ordered list of approved worker identities.
#[derive(Debug, Clone)]
pub struct AllowList {
    ids: Vec<WorkerId>,
    next_available: usize,
}

impl AllowList {
    /// Load from a file with one ULID worker id per line. Blank lines are
    /// skipped; a malformed id is a configuration fault.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DroverError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DroverError::Config(format!("allowlist {}: {e}", path.display())))?;

        let mut ids = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let id = WorkerId::parse(line).map_err(|e| {
                DroverError::Config(format!(
                    "allowlist {} line {}: {e}",
                    path.display(),
                    line_no + 1
                ))
            })?;
            ids.push(id);
        }

        info!(path = %path.display(), workers = ids.len(), "allowlist loaded");
        Ok(Self::from_ids(ids))
    }

    pub fn from_ids(ids: Vec<WorkerId>) -> Self {
        Self {
            ids,
            next_available: 0,
        }
    }

    pub fn contains(&self, id: WorkerId) -> bool {
        self.ids.contains(&id)
    }

    /// Hand out the next unassigned identity.
    pub fn next_available(&mut self) -> Option<WorkerId> {
        let id = self.ids.get(self.next_available).copied()?;
        self.next_available += 1;
        Some(id)
    }

    /// Hand out `n` identities at once, for provisioning a pool.
    pub fn take(&mut self, n: usize) -> Result<Vec<WorkerId>, DroverError> {
        let remaining = self.ids.len() - self.next_available;
        if remaining < n {
            return Err(DroverError::Config(format!(
                "allowlist has {remaining} unassigned worker ids, {n} requested"
            )));
        }
        Ok((0..n).map(|_| self.next_available().unwrap()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("allowlist-{}", Ulid::new()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_ids_skipping_blank_lines() {
        let a = WorkerId::generate();
        let b = WorkerId::generate();
        let path = write_temp(&format!("{}\n\n{}\n", a.as_ulid(), b.as_ulid()));

        let mut list = AllowList::load(&path).unwrap();
        assert!(list.contains(a));
        assert!(list.contains(b));
        assert!(!list.contains(WorkerId::generate()));

        assert_eq!(list.next_available(), Some(a));
        assert_eq!(list.next_available(), Some(b));
        assert_eq!(list.next_available(), None);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn malformed_line_is_a_config_fault() {
        let path = write_temp("definitely not a ulid\n");
        let err = AllowList::load(&path).unwrap_err();
        assert!(matches!(err, DroverError::Config(_)));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_a_config_fault() {
        let err = AllowList::load("/nonexistent/allowlist").unwrap_err();
        assert!(matches!(err, DroverError::Config(_)));
    }

    #[test]
    fn take_requires_enough_unassigned_ids() {
        let mut list =
            AllowList::from_ids(vec![WorkerId::generate(), WorkerId::generate()]);

        let taken = list.take(2).unwrap();
        assert_eq!(taken.len(), 2);
        assert!(list.take(1).is_err());
    }
}
