//! Registry store: always-fresh loads and serialized merge-appends.
//!
//! # Responsibility
//! - Map each vocabulary category to its registry list.
//! - Degrade unreadable registries to empty lists (they are advisory).
//! - Append new values through one read-modify-write critical section per artifact.
//!
//! # Invariants
//! - Appends to the same artifact never interleave; appends to different
//!   artifacts proceed independently.
//! - A failed append leaves the previous artifact content intact.
//! - No in-memory cache: every `load` reads the artifact.

use crate::model::vocabulary::VocabularyCategory;
use crate::registry::codec::{decode, find_item, merge, minimal_template, pending_items};
use crate::registry::template::{NoTemplates, TemplateSource};
use crate::repo::registry_repo::RegistryRepository;
use crate::repo::RepoError;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Status suggestions offered when the status registry is empty.
pub const DEFAULT_STATUSES: &[&str] = &["todo", "in-progress", "blocked", "done", "paused"];

/// Registry append errors.
#[derive(Debug)]
pub enum RegistryError {
    /// Existing artifact could not be read; nothing was written.
    Read {
        category: VocabularyCategory,
        source: RepoError,
    },
    /// Artifact could not be written; previous content is untouched.
    Write {
        category: VocabularyCategory,
        source: RepoError,
    },
}

impl RegistryError {
    pub fn category(&self) -> VocabularyCategory {
        match self {
            Self::Read { category, .. } | Self::Write { category, .. } => *category,
        }
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { category, source } => {
                write!(f, "cannot read {category} registry: {source}")
            }
            Self::Write { category, source } => {
                write!(f, "cannot write {category} registry: {source}")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}

/// Result of one append call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub category: VocabularyCategory,
    /// Values actually appended, in order.
    pub added: Vec<String>,
    /// Whether the artifact was materialized by this call.
    pub created: bool,
}

/// Point-in-time view of every registry, used for validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    lists: BTreeMap<VocabularyCategory, Vec<String>>,
}

impl RegistrySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list for `category`.
    pub fn with<I, S>(mut self, category: VocabularyCategory, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .insert(category, items.into_iter().map(Into::into).collect());
        self
    }

    pub fn items(&self, category: VocabularyCategory) -> &[String] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Case-insensitive lookup returning the registry's display form.
    pub fn find(&self, category: VocabularyCategory, value: &str) -> Option<&str> {
        find_item(self.items(category), value)
    }
}

/// Registry store over a repository implementation.
pub struct RegistryStore<R: RegistryRepository> {
    repo: R,
    templates: Box<dyn TemplateSource + Send + Sync>,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl<R: RegistryRepository> RegistryStore<R> {
    /// Creates a store without templates (fresh registries get a minimal header).
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            templates: Box::new(NoTemplates),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Uses `templates` to seed registries created by `append`/`ensure_registry`.
    pub fn with_templates(
        mut self,
        templates: impl TemplateSource + Send + Sync + 'static,
    ) -> Self {
        self.templates = Box::new(templates);
        self
    }

    pub fn location(&self, category: VocabularyCategory) -> PathBuf {
        self.repo.location(category)
    }

    /// Loads the current items of one registry.
    ///
    /// Never fails: a missing artifact is empty, an unreadable one is empty
    /// plus a warning.
    pub fn load(&self, category: VocabularyCategory) -> Vec<String> {
        match self.repo.read(category) {
            Ok(Some(raw)) => decode(&raw).items,
            Ok(None) => {
                debug!(
                    "event=registry_load module=registry status=skip reason=missing category={}",
                    category
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=registry_load module=registry status=error category={} error={}",
                    category, err
                );
                Vec::new()
            }
        }
    }

    /// Loads every registry into one snapshot.
    pub fn load_all(&self) -> RegistrySnapshot {
        VocabularyCategory::ALL
            .into_iter()
            .fold(RegistrySnapshot::new(), |snapshot, category| {
                snapshot.with(category, self.load(category))
            })
    }

    /// Values to offer a picker; an empty status registry falls back to
    /// `DEFAULT_STATUSES`.
    pub fn suggestions(&self, category: VocabularyCategory) -> Vec<String> {
        let items = self.load(category);
        if items.is_empty() && category == VocabularyCategory::Status {
            return DEFAULT_STATUSES.iter().map(|s| (*s).to_string()).collect();
        }
        items
    }

    /// Appends values not yet present (case-insensitively) to a registry.
    ///
    /// A missing artifact is first materialized from the template source.
    /// Appending only known values performs no write.
    pub fn append(
        &self,
        category: VocabularyCategory,
        new_items: &[String],
    ) -> Result<AppendOutcome, RegistryError> {
        let mut outcome = AppendOutcome {
            category,
            added: Vec::new(),
            created: false,
        };
        if new_items.is_empty() {
            return Ok(outcome);
        }

        let started_at = Instant::now();
        let lock = self.artifact_lock(category);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let existing = match self.read_for_write(category)? {
            Some(raw) => raw,
            None => {
                let seed = self.seed_content(category);
                self.write(category, &seed)?;
                outcome.created = true;
                seed
            }
        };

        outcome.added = pending_items(&decode(&existing).items, new_items);
        if outcome.added.is_empty() {
            debug!(
                "event=registry_append module=registry status=skip reason=already_present category={}",
                category
            );
            return Ok(outcome);
        }

        let merged = merge(Some(existing.as_str()), category, new_items);
        self.write(category, &merged)?;
        info!(
            "event=registry_append module=registry status=ok category={} added={} created={} duration_ms={}",
            category,
            outcome.added.len(),
            outcome.created,
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }

    /// Materializes a missing registry from its template.
    ///
    /// Returns `true` when the artifact was created, `false` when it existed.
    pub fn ensure_registry(&self, category: VocabularyCategory) -> Result<bool, RegistryError> {
        let lock = self.artifact_lock(category);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.read_for_write(category)?.is_some() {
            return Ok(false);
        }
        let seed = self.seed_content(category);
        self.write(category, &seed)?;
        info!(
            "event=registry_bootstrap module=registry status=ok category={}",
            category
        );
        Ok(true)
    }

    fn read_for_write(
        &self,
        category: VocabularyCategory,
    ) -> Result<Option<String>, RegistryError> {
        self.repo.read(category).map_err(|source| {
            warn!(
                "event=registry_read module=registry status=error category={} error={}",
                category, source
            );
            RegistryError::Read { category, source }
        })
    }

    fn write(&self, category: VocabularyCategory, content: &str) -> Result<(), RegistryError> {
        self.repo.write(category, content).map_err(|source| {
            warn!(
                "event=registry_write module=registry status=error category={} error={}",
                category, source
            );
            RegistryError::Write { category, source }
        })
    }

    fn seed_content(&self, category: VocabularyCategory) -> String {
        self.templates.template(category).unwrap_or_else(|| {
            debug!(
                "event=registry_seed module=registry status=fallback category={}",
                category
            );
            minimal_template(category)
        })
    }

    fn artifact_lock(&self, category: VocabularyCategory) -> Arc<Mutex<()>> {
        let location = self.repo.location(category);
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(location).or_default())
    }
}
