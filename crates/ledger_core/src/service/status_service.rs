//! Status change use-case for existing entries.
//!
//! # Responsibility
//! - Validate a new status against the status registry.
//! - Rewrite only the header `status` value of one entry.
//!
//! # Invariants
//! - A non-empty status registry only admits its own values, written in the
//!   registry's display casing.
//! - Entry body bytes are never modified; the rewrite is atomic.

use crate::entry::frontmatter::{read_header_value, set_header_value};
use crate::model::vocabulary::VocabularyCategory;
use crate::registry::codec::find_item;
use crate::registry::store::RegistryStore;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::registry_repo::RegistryRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const STATUS_KEY: &str = "status";

/// Status change errors.
#[derive(Debug)]
pub enum StatusChangeError {
    /// Status is blank after trim.
    InvalidStatus,
    /// Status is absent from a non-empty status registry.
    NotInRegistry(String),
    EntryNotFound(PathBuf),
    Repo(RepoError),
}

impl Display for StatusChangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus => write!(f, "status must not be blank"),
            Self::NotInRegistry(value) => {
                write!(f, "status `{value}` is not in the statuses registry")
            }
            Self::EntryNotFound(path) => write!(f, "entry not found: {}", path.display()),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StatusChangeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StatusChangeError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Status service facade.
pub struct StatusService<'s, R: RegistryRepository, E: EntryRepository> {
    registries: &'s RegistryStore<R>,
    entries: E,
}

impl<'s, R: RegistryRepository, E: EntryRepository> StatusService<'s, R, E> {
    pub fn new(registries: &'s RegistryStore<R>, entries: E) -> Self {
        Self {
            registries,
            entries,
        }
    }

    /// Returns the entry's current header status, if any.
    pub fn current_status(&self, entry: &Path) -> Result<Option<String>, StatusChangeError> {
        let content = self.read_entry(entry)?;
        Ok(read_header_value(&content, STATUS_KEY))
    }

    /// Sets the entry's header status and returns the value written.
    pub fn set_status(&self, entry: &Path, new_status: &str) -> Result<String, StatusChangeError> {
        let requested = new_status.trim();
        if requested.is_empty() {
            return Err(StatusChangeError::InvalidStatus);
        }

        let statuses = self.registries.load(VocabularyCategory::Status);
        let applied = if statuses.is_empty() {
            requested.to_string()
        } else {
            find_item(&statuses, requested)
                .map(str::to_string)
                .ok_or_else(|| StatusChangeError::NotInRegistry(requested.to_string()))?
        };

        let content = self.read_entry(entry)?;
        if read_header_value(&content, STATUS_KEY).as_deref() == Some(applied.as_str()) {
            info!("event=status_change module=status status=skip reason=unchanged");
            return Ok(applied);
        }

        let updated = set_header_value(&content, STATUS_KEY, &applied);
        self.entries.replace(entry, &updated)?;
        info!("event=status_change module=status status=ok");
        Ok(applied)
    }

    fn read_entry(&self, entry: &Path) -> Result<String, StatusChangeError> {
        self.entries
            .read(entry)?
            .ok_or_else(|| StatusChangeError::EntryNotFound(entry.to_path_buf()))
    }
}
