//! Entry capture use-case (validate, register, allocate, write).
//!
//! # Responsibility
//! - Run one entry creation as a single logical transaction:
//!   `Validating -> Registering -> Allocating -> Writing -> Done`.
//! - Report rejections and fatal I/O failures with the stage they came from.
//!
//! # Invariants
//! - A rejection writes nothing and registers nothing.
//! - Registration failures are logged and never abort creation.
//! - Registrations that completed before an allocation/write failure stay in
//!   place; re-submitting finds them present and skips them.
//! - The entry file is created exclusively; an occupied name moves on to the
//!   next ` (n)` suffix instead of overwriting.

use crate::entry::builder::build_entry;
use crate::entry::path::{allocate, first_free, AllocatedPath, MAX_COLLISION_SUFFIX};
use crate::model::entry::{EntryDraft, EntryFields};
use crate::model::vocabulary::VocabularyCategory;
use crate::registry::store::{AppendOutcome, RegistryStore};
use crate::repo::entry_repo::{CreateOutcome, EntryRepository};
use crate::repo::registry_repo::RegistryRepository;
use crate::repo::RepoError;
use crate::service::validation::{
    validate_draft, ValidatedEntry, ValidationPolicy, ValidationRejection,
};
use chrono::{Local, NaiveDateTime, Timelike};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    Validating,
    Registering,
    Allocating,
    Writing,
    Done,
}

impl Display for CaptureStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Validating => "validating",
            Self::Registering => "registering",
            Self::Allocating => "allocating",
            Self::Writing => "writing",
            Self::Done => "done",
        })
    }
}

/// Terminal capture failure.
#[derive(Debug)]
pub enum CaptureError {
    /// Validation failed; nothing was written.
    Rejected(ValidationRejection),
    /// Date folder creation or name probing failed.
    Allocation(RepoError),
    /// Entry file creation failed.
    Write(RepoError),
}

impl CaptureError {
    /// Stage the pipeline was in when it stopped.
    pub fn stage(&self) -> CaptureStage {
        match self {
            Self::Rejected(_) => CaptureStage::Validating,
            Self::Allocation(_) => CaptureStage::Allocating,
            Self::Write(_) => CaptureStage::Writing,
        }
    }

    pub fn rejection(&self) -> Option<&ValidationRejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl Display for CaptureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "entry rejected: {rejection}"),
            Self::Allocation(err) => write!(f, "cannot allocate entry path: {err}"),
            Self::Write(err) => write!(f, "cannot write entry: {err}"),
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Allocation(err) | Self::Write(err) => Some(err),
        }
    }
}

impl From<ValidationRejection> for CaptureError {
    fn from(value: ValidationRejection) -> Self {
        Self::Rejected(value)
    }
}

/// A registration that could not be persisted (non-fatal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFailure {
    pub category: VocabularyCategory,
    pub message: String,
}

/// Successful capture result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub path: PathBuf,
    pub file_name: String,
    pub fields: EntryFields,
    /// One outcome per attempted registration, including no-op ones.
    pub registered: Vec<AppendOutcome>,
    pub registration_failures: Vec<RegistrationFailure>,
}

/// Post-stage notifications for the host (status messages, opening the file).
pub trait CaptureObserver {
    /// Called after an append actually added values to a registry.
    fn values_registered(&self, _outcome: &AppendOutcome) {}
    /// Called once the entry file exists.
    fn entry_created(&self, _outcome: &CaptureOutcome) {}
}

/// Capture service over registry and entry repositories.
pub struct CaptureService<'s, R: RegistryRepository, E: EntryRepository> {
    registries: &'s RegistryStore<R>,
    entries: E,
    root: PathBuf,
    frontmatter_type: String,
    policy: ValidationPolicy,
    observer: Option<Box<dyn CaptureObserver + 's>>,
}

impl<'s, R: RegistryRepository, E: EntryRepository> CaptureService<'s, R, E> {
    /// Creates a service writing entries under `root`.
    pub fn new(
        registries: &'s RegistryStore<R>,
        entries: E,
        root: impl Into<PathBuf>,
        frontmatter_type: impl Into<String>,
    ) -> Self {
        Self {
            registries,
            entries,
            root: root.into(),
            frontmatter_type: frontmatter_type.into(),
            policy: ValidationPolicy::default(),
            observer: None,
        }
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer(mut self, observer: impl CaptureObserver + 's) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Captures `draft` stamped with the current local time.
    pub fn capture_now(&self, draft: &EntryDraft) -> Result<CaptureOutcome, CaptureError> {
        self.capture(draft, Local::now().naive_local())
    }

    /// Captures `draft` stamped with `now` (truncated to whole seconds).
    pub fn capture(
        &self,
        draft: &EntryDraft,
        now: NaiveDateTime,
    ) -> Result<CaptureOutcome, CaptureError> {
        let started_at = Instant::now();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);

        trace_stage(CaptureStage::Validating);
        let ValidatedEntry {
            fields,
            registrations,
        } = match validate_draft(draft, &self.registries.load_all(), &self.policy) {
            Ok(validated) => validated,
            Err(rejection) => {
                info!(
                    "event=capture module=capture status=rejected field={} duration_ms={}",
                    rejection.field,
                    started_at.elapsed().as_millis()
                );
                return Err(rejection.into());
            }
        };

        trace_stage(CaptureStage::Registering);
        let mut registered = Vec::with_capacity(registrations.len());
        let mut registration_failures = Vec::new();
        for registration in &registrations {
            match self
                .registries
                .append(registration.category, &registration.values)
            {
                Ok(outcome) => {
                    if !outcome.added.is_empty() {
                        if let Some(observer) = &self.observer {
                            observer.values_registered(&outcome);
                        }
                    }
                    registered.push(outcome);
                }
                Err(err) => {
                    warn!(
                        "event=capture_register module=capture status=error category={} error={}",
                        err.category(),
                        err
                    );
                    registration_failures.push(RegistrationFailure {
                        category: err.category(),
                        message: err.to_string(),
                    });
                }
            }
        }

        trace_stage(CaptureStage::Allocating);
        let allocated = allocate(&self.entries, &self.root, timestamp, &fields.title)
            .map_err(|err| self.fail(CaptureError::Allocation(err), started_at))?;

        trace_stage(CaptureStage::Writing);
        let content = build_entry(&fields, timestamp, &self.frontmatter_type);
        let written = self
            .write_exclusive(allocated, &content)
            .map_err(|err| self.fail(err, started_at))?;

        trace_stage(CaptureStage::Done);
        let outcome = CaptureOutcome {
            path: written.path(),
            file_name: written.file_name(),
            fields,
            registered,
            registration_failures,
        };
        info!(
            "event=capture module=capture status=ok suffix={} registrations={} registration_failures={} duration_ms={}",
            written.suffix(),
            outcome.registered.len(),
            outcome.registration_failures.len(),
            started_at.elapsed().as_millis()
        );
        if let Some(observer) = &self.observer {
            observer.entry_created(&outcome);
        }
        Ok(outcome)
    }

    /// Creates the entry at `allocated`, moving to the next free suffix when
    /// another writer took the name after probing.
    fn write_exclusive(
        &self,
        allocated: AllocatedPath,
        content: &str,
    ) -> Result<AllocatedPath, CaptureError> {
        let mut candidate = allocated;
        loop {
            match self
                .entries
                .create_new(&candidate.path(), content)
                .map_err(CaptureError::Write)?
            {
                CreateOutcome::Created => return Ok(candidate),
                CreateOutcome::AlreadyExists => {
                    if candidate.suffix() >= MAX_COLLISION_SUFFIX {
                        return Err(CaptureError::Allocation(RepoError::InvalidData(format!(
                            "no free entry name after {MAX_COLLISION_SUFFIX} attempts in `{}`",
                            candidate.dir().display()
                        ))));
                    }
                    debug!(
                        "event=capture_collision module=capture status=retry suffix={}",
                        candidate.suffix()
                    );
                    candidate = first_free(&self.entries, candidate.next_candidate())
                        .map_err(CaptureError::Allocation)?;
                }
            }
        }
    }

    fn fail(&self, err: CaptureError, started_at: Instant) -> CaptureError {
        warn!(
            "event=capture module=capture status=error stage={} duration_ms={} error={}",
            err.stage(),
            started_at.elapsed().as_millis(),
            err
        );
        err
    }
}

fn trace_stage(stage: CaptureStage) {
    debug!("event=capture_stage module=capture stage={stage}");
}
