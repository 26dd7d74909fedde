//! Field validation against registry snapshots.
//!
//! # Responsibility
//! - Turn an `EntryDraft` plus a `RegistrySnapshot` into either a normalized
//!   `EntryFields` with queued auto-registrations, or a terminal rejection.
//! - Own tag slug normalization.
//!
//! # Invariants
//! - Pure: no I/O, no registry writes. A rejection therefore has no side effects.
//! - Comparisons are case-insensitive on trimmed values.
//! - An empty registry accepts any non-empty value (registries are advisory).
//! - Accepted registry values are returned in the registry's display casing.

use crate::model::entry::{EntryDraft, EntryField, EntryFields};
use crate::model::vocabulary::VocabularyCategory;
use crate::registry::store::RegistrySnapshot;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\-]+").expect("valid slug charset regex"));
static HYPHEN_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("valid hyphen regex"));

/// What happens to a value that is not in its (non-empty) registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPolicy {
    /// Accept and append the value to the registry before writing the entry.
    AutoRegister,
    /// Reject the entry; the registry must be edited out-of-band first.
    Reject,
    /// Accept without checking or registering.
    Unchecked,
}

/// Per-field policy for the optional registry-backed fields.
///
/// `status` is always required and rejecting; tags are always open
/// vocabulary; `category` is always free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub project: RegistrationPolicy,
    pub action: RegistrationPolicy,
    pub deliverable: RegistrationPolicy,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            project: RegistrationPolicy::AutoRegister,
            action: RegistrationPolicy::Reject,
            deliverable: RegistrationPolicy::Reject,
        }
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    /// Required value is empty after trim.
    Missing,
    /// Value is absent from a non-empty registry whose policy rejects.
    NotInRegistry { value: String },
}

/// Terminal validation failure naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRejection {
    pub field: EntryField,
    pub reason: RejectionReason,
}

impl ValidationRejection {
    fn missing(field: EntryField) -> Self {
        Self {
            field,
            reason: RejectionReason::Missing,
        }
    }

    fn not_in_registry(field: EntryField, value: &str) -> Self {
        Self {
            field,
            reason: RejectionReason::NotInRegistry {
                value: value.to_string(),
            },
        }
    }
}

impl Display for ValidationRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            RejectionReason::Missing => write!(f, "{} is required", self.field),
            RejectionReason::NotInRegistry { value } => match self.field.vocabulary() {
                Some(category) => write!(
                    f,
                    "{} `{value}` is not in the {} registry",
                    self.field,
                    category.registry_name()
                ),
                None => write!(f, "{} `{value}` is not allowed", self.field),
            },
        }
    }
}

impl Error for ValidationRejection {}

/// Values to append to one registry before the entry is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub category: VocabularyCategory,
    pub values: Vec<String>,
}

/// Successful validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    pub fields: EntryFields,
    pub registrations: Vec<Registration>,
}

/// Outcome of checking one optional field against its registry.
enum FieldCheck {
    Empty,
    Accepted(String),
    New(String),
}

/// Validates `draft` against `snapshot` under `policy`.
pub fn validate_draft(
    draft: &EntryDraft,
    snapshot: &RegistrySnapshot,
    policy: &ValidationPolicy,
) -> Result<ValidatedEntry, ValidationRejection> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationRejection::missing(EntryField::Title));
    }

    let status = draft.status.trim();
    if status.is_empty() {
        return Err(ValidationRejection::missing(EntryField::Status));
    }
    let status = match check_field(
        snapshot,
        EntryField::Status,
        status,
        RegistrationPolicy::Reject,
    )? {
        FieldCheck::Accepted(value) | FieldCheck::New(value) => value,
        FieldCheck::Empty => return Err(ValidationRejection::missing(EntryField::Status)),
    };

    let mut registrations = Vec::new();
    let mut resolve = |field: EntryField,
                       raw: &str,
                       field_policy: RegistrationPolicy|
     -> Result<Option<String>, ValidationRejection> {
        match check_field(snapshot, field, raw.trim(), field_policy)? {
            FieldCheck::Empty => Ok(None),
            FieldCheck::Accepted(value) => Ok(Some(value)),
            FieldCheck::New(value) => {
                if let Some(category) = field.vocabulary() {
                    registrations.push(Registration {
                        category,
                        values: vec![value.clone()],
                    });
                }
                Ok(Some(value))
            }
        }
    };

    let project = resolve(EntryField::Project, &draft.project, policy.project)?;
    let action = resolve(EntryField::Action, &draft.action, policy.action)?;
    let deliverable = resolve(EntryField::Deliverable, &draft.deliverable, policy.deliverable)?;

    let tags = parse_tags(&draft.tags);
    if !tags.is_empty() {
        registrations.push(Registration {
            category: VocabularyCategory::Tag,
            values: tags.clone(),
        });
    }

    let category = Some(draft.category.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let notes = Some(draft.notes.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(ValidatedEntry {
        fields: EntryFields {
            title: title.to_string(),
            project,
            status,
            category,
            action,
            deliverable,
            tags,
            notes,
        },
        registrations,
    })
}

fn check_field(
    snapshot: &RegistrySnapshot,
    field: EntryField,
    value: &str,
    policy: RegistrationPolicy,
) -> Result<FieldCheck, ValidationRejection> {
    if value.is_empty() {
        return Ok(FieldCheck::Empty);
    }
    let Some(category) = field.vocabulary() else {
        return Ok(FieldCheck::Accepted(value.to_string()));
    };
    if policy == RegistrationPolicy::Unchecked {
        return Ok(FieldCheck::Accepted(value.to_string()));
    }
    if let Some(known) = snapshot.find(category, value) {
        return Ok(FieldCheck::Accepted(known.to_string()));
    }

    match policy {
        RegistrationPolicy::AutoRegister => Ok(FieldCheck::New(value.to_string())),
        _ if snapshot.items(category).is_empty() => Ok(FieldCheck::Accepted(value.to_string())),
        _ => Err(ValidationRejection::not_in_registry(field, value)),
    }
}

/// Normalizes free text into a tag slug; `None` when nothing remains.
///
/// Lowercases, turns whitespace runs into hyphens, strips characters other
/// than word characters and hyphens, collapses hyphen runs and trims
/// leading/trailing hyphens. Word characters are Unicode-aware, so accented
/// and non-Latin letters are kept (`café` stays `café`, not `caf`).
pub fn slugify(value: &str) -> Option<String> {
    let lowered = value.trim().to_lowercase();
    let hyphenated = WHITESPACE_RE.replace_all(&lowered, "-");
    let stripped = NON_SLUG_RE.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUN_RE.replace_all(&stripped, "-");
    let slug = collapsed.trim_matches('-');
    if slug.is_empty() {
        None
    } else {
        Some(slug.to_string())
    }
}

/// Splits comma-separated tag input into unique slugs, first occurrence first.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for slug in raw.split(',').filter_map(slugify) {
        if !tags.contains(&slug) {
            tags.push(slug);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::{parse_tags, slugify};

    #[test]
    fn slugify_normalizes_free_text() {
        assert_eq!(slugify("Deep  Work!!").as_deref(), Some("deep-work"));
        assert_eq!(slugify(" --Rust / Async-- ").as_deref(), Some("rust-async"));
        assert_eq!(slugify("snake_case ok").as_deref(), Some("snake_case-ok"));
    }

    #[test]
    fn slugify_keeps_non_ascii_letters() {
        assert_eq!(slugify("Café Notes").as_deref(), Some("café-notes"));
        assert_eq!(slugify("日本語 メモ").as_deref(), Some("日本語-メモ"));
    }

    #[test]
    fn slugify_drops_blank_results() {
        assert_eq!(slugify(""), None);
        assert_eq!(slugify("   "), None);
        assert_eq!(slugify("!!!"), None);
    }

    #[test]
    fn parse_tags_splits_dedupes_and_drops_blanks() {
        assert_eq!(
            parse_tags("writing, draft,, Writing ,  , Deep Work"),
            vec!["writing", "draft", "deep-work"]
        );
        assert!(parse_tags("").is_empty());
    }
}
