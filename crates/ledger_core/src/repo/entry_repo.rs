//! Entry artifact repository.
//!
//! # Responsibility
//! - Create date-partition folders and entry files.
//! - Read and rewrite existing entries for header edits.
//!
//! # Invariants
//! - `create_new` never overwrites: an occupied path yields `AlreadyExists`.
//! - `ensure_dir` treats an existing folder as success.

use super::{read_optional, write_atomic, RepoError, RepoResult};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Result of an exclusive create attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Repository interface for entry artifacts.
pub trait EntryRepository {
    /// Creates `dir` and any missing parents.
    fn ensure_dir(&self, dir: &Path) -> RepoResult<()>;
    fn exists(&self, path: &Path) -> bool;
    /// Creates `path` exclusively with `content`.
    fn create_new(&self, path: &Path, content: &str) -> RepoResult<CreateOutcome>;
    fn read(&self, path: &Path) -> RepoResult<Option<String>>;
    /// Replaces an existing entry's content atomically.
    fn replace(&self, path: &Path, content: &str) -> RepoResult<()>;
}

/// Filesystem-backed entry repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsEntryRepository;

impl EntryRepository for FsEntryRepository {
    fn ensure_dir(&self, dir: &Path) -> RepoResult<()> {
        match std::fs::create_dir_all(dir) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
            Err(err) => Err(RepoError::io(dir, err)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_new(&self, path: &Path, content: &str) -> RepoResult<CreateOutcome> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Ok(CreateOutcome::AlreadyExists)
            }
            Err(err) => return Err(RepoError::io(path, err)),
        };

        if let Err(err) = file.write_all(content.as_bytes()).and_then(|()| file.sync_all()) {
            drop(file);
            // The empty/partial file would otherwise occupy the slot.
            let _ = std::fs::remove_file(path);
            return Err(RepoError::io(path, err));
        }
        Ok(CreateOutcome::Created)
    }

    fn read(&self, path: &Path) -> RepoResult<Option<String>> {
        read_optional(path)
    }

    fn replace(&self, path: &Path, content: &str) -> RepoResult<()> {
        write_atomic(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::{CreateOutcome, EntryRepository, FsEntryRepository};

    #[test]
    fn create_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entry.md");
        let repo = FsEntryRepository;

        assert_eq!(repo.create_new(&path, "one").unwrap(), CreateOutcome::Created);
        assert_eq!(
            repo.create_new(&path, "two").unwrap(),
            CreateOutcome::AlreadyExists
        );
        assert_eq!(repo.read(&path).unwrap().as_deref(), Some("one"));
    }

    #[test]
    fn ensure_dir_is_idempotent_but_rejects_file_in_the_way() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsEntryRepository;
        let nested = dir.path().join("2024/05/06");
        repo.ensure_dir(&nested).unwrap();
        repo.ensure_dir(&nested).unwrap();

        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "file").unwrap();
        assert!(repo.ensure_dir(&blocker.join("child")).is_err());
    }
}
