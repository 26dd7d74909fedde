//! Ledger entry draft and validated field shapes.
//!
//! # Responsibility
//! - Carry raw caller input (`EntryDraft`) into validation.
//! - Carry normalized, registry-checked values (`EntryFields`) into entry synthesis.
//!
//! # Invariants
//! - `EntryFields::title` and `EntryFields::status` are non-empty and trimmed.
//! - Optional fields are `None` rather than empty strings.
//! - `EntryFields::tags` holds unique, non-empty slugs in first-seen order.

use crate::model::vocabulary::VocabularyCategory;
use std::fmt::{Display, Formatter};

/// Raw field values as supplied by a form, CLI or test harness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub project: String,
    pub status: String,
    /// Free-text classification; never validated against a registry.
    pub category: String,
    pub action: String,
    pub deliverable: String,
    /// Comma-separated tag input, slugified during validation.
    pub tags: String,
    pub notes: String,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
            ..Self::default()
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_deliverable(mut self, deliverable: impl Into<String>) -> Self {
        self.deliverable = deliverable.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Normalized field set ready for entry synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub title: String,
    pub project: Option<String>,
    pub status: String,
    pub category: Option<String>,
    pub action: Option<String>,
    pub deliverable: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

/// Entry field identifiers used to report rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    Title,
    Project,
    Status,
    Category,
    Action,
    Deliverable,
    Tags,
}

impl EntryField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Project => "project",
            Self::Status => "status",
            Self::Category => "category",
            Self::Action => "action",
            Self::Deliverable => "deliverable",
            Self::Tags => "tags",
        }
    }

    /// Registry backing this field, if any.
    pub fn vocabulary(self) -> Option<VocabularyCategory> {
        match self {
            Self::Project => Some(VocabularyCategory::Project),
            Self::Status => Some(VocabularyCategory::Status),
            Self::Action => Some(VocabularyCategory::Action),
            Self::Deliverable => Some(VocabularyCategory::Deliverable),
            Self::Tags => Some(VocabularyCategory::Tag),
            Self::Title | Self::Category => None,
        }
    }
}

impl Display for EntryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
