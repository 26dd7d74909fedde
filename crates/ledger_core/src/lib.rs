//! Core domain logic for the creation ledger.
//! This crate is the single source of truth for registry and entry invariants;
//! forms, command lines and editors call into it with raw field values.

pub mod config;
pub mod entry;
pub mod logging;
pub mod model;
pub mod registry;
pub mod repo;
pub mod service;

pub use config::{load_settings, save_settings, ConfigError, LedgerPaths, LedgerSettings};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::entry::{EntryDraft, EntryField, EntryFields};
pub use model::vocabulary::VocabularyCategory;
pub use registry::store::{
    AppendOutcome, RegistryError, RegistrySnapshot, RegistryStore, DEFAULT_STATUSES,
};
pub use registry::template::{BuiltinTemplates, DirTemplates, NoTemplates, TemplateSource};
pub use repo::entry_repo::{EntryRepository, FsEntryRepository};
pub use repo::registry_repo::{FsRegistryRepository, RegistryRepository};
pub use repo::{RepoError, RepoResult};
pub use service::bootstrap_service::{ensure_layout, ensure_registries, BootstrapReport};
pub use service::capture_service::{
    CaptureError, CaptureObserver, CaptureOutcome, CaptureService, CaptureStage,
};
pub use service::status_service::{StatusChangeError, StatusService};
pub use service::validation::{
    parse_tags, slugify, validate_draft, RegistrationPolicy, RejectionReason, ValidationPolicy,
    ValidationRejection,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
