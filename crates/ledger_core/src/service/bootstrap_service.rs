//! First-run layout and registry bootstrap.
//!
//! # Responsibility
//! - Create the root and archive folders.
//! - Materialize missing registries from templates without touching existing ones.
//!
//! # Invariants
//! - Bootstrap is idempotent.
//! - One registry failing does not stop the others.

use crate::config::LedgerPaths;
use crate::model::vocabulary::VocabularyCategory;
use crate::registry::store::RegistryStore;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::registry_repo::RegistryRepository;
use crate::repo::RepoResult;
use log::{info, warn};

/// Per-category bootstrap results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub created: Vec<VocabularyCategory>,
    pub existing: Vec<VocabularyCategory>,
    pub failed: Vec<(VocabularyCategory, String)>,
}

impl BootstrapReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Creates the root and archive folders.
pub fn ensure_layout<E: EntryRepository + ?Sized>(
    entries: &E,
    paths: &LedgerPaths,
) -> RepoResult<()> {
    entries.ensure_dir(paths.root())?;
    entries.ensure_dir(paths.archive())?;
    info!("event=bootstrap_layout module=bootstrap status=ok");
    Ok(())
}

/// Materializes every missing registry from the store's templates.
pub fn ensure_registries<R: RegistryRepository>(store: &RegistryStore<R>) -> BootstrapReport {
    let mut report = BootstrapReport::default();
    for category in VocabularyCategory::ALL {
        match store.ensure_registry(category) {
            Ok(true) => report.created.push(category),
            Ok(false) => report.existing.push(category),
            Err(err) => {
                warn!(
                    "event=bootstrap_registry module=bootstrap status=error category={} error={}",
                    category, err
                );
                report.failed.push((category, err.to_string()));
            }
        }
    }
    info!(
        "event=bootstrap_registries module=bootstrap status={} created={} existing={} failed={}",
        if report.is_ok() { "ok" } else { "partial" },
        report.created.len(),
        report.existing.len(),
        report.failed.len()
    );
    report
}
