//! Controlled vocabulary categories.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One axis of controlled vocabulary, each backed by its own registry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyCategory {
    Project,
    /// Required on every entry; must resolve to one registry value.
    Status,
    Tag,
    Action,
    Deliverable,
}

impl VocabularyCategory {
    /// All categories in registry bootstrap order.
    pub const ALL: [Self; 5] = [
        Self::Project,
        Self::Status,
        Self::Tag,
        Self::Action,
        Self::Deliverable,
    ];

    /// Singular key used in entry headers and log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Status => "status",
            Self::Tag => "tag",
            Self::Action => "action",
            Self::Deliverable => "deliverable",
        }
    }

    /// Stable logical registry name (plural), written into default headers.
    pub fn registry_name(self) -> &'static str {
        match self {
            Self::Project => "projects",
            Self::Status => "statuses",
            Self::Tag => "tags",
            Self::Action => "actions",
            Self::Deliverable => "deliverables",
        }
    }

    /// Registry file name used when configuration does not override it.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Project => "_projects.md",
            Self::Status => "_statuses.md",
            Self::Tag => "_tags.md",
            Self::Action => "_actions.md",
            Self::Deliverable => "_deliverables.md",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Self::Status)
    }

    /// Parses a singular or plural category name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| {
            normalized == category.as_str() || normalized == category.registry_name()
        })
    }
}

impl Display for VocabularyCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
