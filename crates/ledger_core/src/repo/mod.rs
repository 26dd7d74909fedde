//! Persistence contracts and filesystem implementations.
//!
//! # Responsibility
//! - Define the file abstractions registries and entries are persisted through.
//! - Keep `std::fs` details inside the repository boundary.
//!
//! # Invariants
//! - Every overwrite is a full-content, all-or-nothing replacement
//!   (write to a sibling temp file, then rename).
//! - A missing artifact is reported as `Ok(None)`, never as an error.

pub mod entry_repo;
pub mod registry_repo;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for artifact reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o failure at `{}`: {source}", path.display()),
            Self::InvalidData(message) => write!(f, "invalid artifact data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidData(_) => None,
        }
    }
}

/// Reads a UTF-8 text artifact, mapping "not found" to `None`.
pub fn read_optional(path: &Path) -> RepoResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(RepoError::io(path, err)),
    }
}

/// Replaces `path` with `content` atomically, creating parent folders.
///
/// Readers observe either the previous content or the new content, never a
/// partial write.
pub fn write_atomic(path: &Path, content: &str) -> RepoResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|err| RepoError::io(parent, err))?;

    let mut staged = NamedTempFile::new_in(parent).map_err(|err| RepoError::io(parent, err))?;
    staged
        .write_all(content.as_bytes())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|err| RepoError::io(staged.path(), err))?;
    staged
        .persist(path)
        .map_err(|err| RepoError::io(path, err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_optional, write_atomic};

    #[test]
    fn read_optional_maps_missing_file_to_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("absent.md")).unwrap().is_none());
    }

    #[test]
    fn write_atomic_creates_parents_and_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/registry.md");
        write_atomic(&path, "first\n").unwrap();
        write_atomic(&path, "second\n").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("second\n"));

        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1, "staged temp files must not linger");
    }
}
