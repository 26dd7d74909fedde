//! Registry artifact repository.
//!
//! # Responsibility
//! - Resolve each vocabulary category to its backing artifact.
//! - Read and fully overwrite registry text.
//!
//! # Invariants
//! - Writes are atomic per artifact (see `write_atomic`).

use super::{read_optional, write_atomic, RepoResult};
use crate::config::LedgerPaths;
use crate::model::vocabulary::VocabularyCategory;
use std::path::PathBuf;

/// Repository interface for registry artifacts.
pub trait RegistryRepository {
    /// Location used for diagnostics and per-artifact locking.
    fn location(&self, category: VocabularyCategory) -> PathBuf;
    /// Returns the artifact text, or `None` when it does not exist.
    fn read(&self, category: VocabularyCategory) -> RepoResult<Option<String>>;
    /// Replaces the whole artifact with `content`.
    fn write(&self, category: VocabularyCategory, content: &str) -> RepoResult<()>;
}

/// Filesystem-backed registry repository.
#[derive(Debug, Clone)]
pub struct FsRegistryRepository {
    paths: LedgerPaths,
}

impl FsRegistryRepository {
    pub fn new(paths: &LedgerPaths) -> Self {
        Self {
            paths: paths.clone(),
        }
    }
}

impl RegistryRepository for FsRegistryRepository {
    fn location(&self, category: VocabularyCategory) -> PathBuf {
        self.paths.registry(category)
    }

    fn read(&self, category: VocabularyCategory) -> RepoResult<Option<String>> {
        read_optional(&self.location(category))
    }

    fn write(&self, category: VocabularyCategory, content: &str) -> RepoResult<()> {
        write_atomic(&self.location(category), content)
    }
}
