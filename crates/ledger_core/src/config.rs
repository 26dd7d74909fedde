//! Ledger settings and path resolution.
//!
//! # Responsibility
//! - Load/save the JSON settings document owned by the host application.
//! - Normalize user-edited values and fall back to defaults.
//! - Resolve the root, archive and registry locations under a vault.
//!
//! # Invariants
//! - Loaded settings are always normalized: no empty folder names, no empty
//!   frontmatter type, no empty registry file names.
//! - A missing settings file is not an error; defaults apply.

use crate::model::vocabulary::VocabularyCategory;
use crate::repo::{read_optional, write_atomic, RepoError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT_FOLDER: &str = "CreationLedger";
pub const DEFAULT_ARCHIVE_FOLDER: &str = "archive";
pub const DEFAULT_FRONTMATTER_TYPE: &str = "creation-ledger";

/// Settings consumed by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerSettings {
    /// Folder (relative to the vault) holding entries and registries.
    pub root_folder: String,
    /// Archive folder name under the root. Only created here; archival is external.
    pub archive_folder_name: String,
    /// Value of the `type` key in every entry header.
    pub frontmatter_type: String,
    pub registries: RegistryFileNames,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            root_folder: DEFAULT_ROOT_FOLDER.to_string(),
            archive_folder_name: DEFAULT_ARCHIVE_FOLDER.to_string(),
            frontmatter_type: DEFAULT_FRONTMATTER_TYPE.to_string(),
            registries: RegistryFileNames::default(),
        }
    }
}

impl LedgerSettings {
    /// Returns a copy with every field normalized or reverted to its default.
    pub fn normalized(&self) -> Self {
        let root_folder = normalize_folder_name(&self.root_folder).unwrap_or_else(|| {
            warn!("event=settings_normalize module=config status=fallback field=rootFolder");
            DEFAULT_ROOT_FOLDER.to_string()
        });
        let archive_folder_name =
            normalize_folder_name(&self.archive_folder_name).unwrap_or_else(|| {
                warn!(
                    "event=settings_normalize module=config status=fallback field=archiveFolderName"
                );
                DEFAULT_ARCHIVE_FOLDER.to_string()
            });
        let frontmatter_type = match self.frontmatter_type.trim() {
            "" => {
                warn!(
                    "event=settings_normalize module=config status=fallback field=frontmatterType"
                );
                DEFAULT_FRONTMATTER_TYPE.to_string()
            }
            value => value.to_string(),
        };

        Self {
            root_folder,
            archive_folder_name,
            frontmatter_type,
            registries: self.registries.normalized(),
        }
    }
}

/// Per-category registry file names, relative to the root folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryFileNames {
    pub projects: String,
    pub statuses: String,
    pub tags: String,
    pub actions: String,
    pub deliverables: String,
}

impl Default for RegistryFileNames {
    fn default() -> Self {
        Self {
            projects: VocabularyCategory::Project.default_file_name().to_string(),
            statuses: VocabularyCategory::Status.default_file_name().to_string(),
            tags: VocabularyCategory::Tag.default_file_name().to_string(),
            actions: VocabularyCategory::Action.default_file_name().to_string(),
            deliverables: VocabularyCategory::Deliverable.default_file_name().to_string(),
        }
    }
}

impl RegistryFileNames {
    pub fn file_name(&self, category: VocabularyCategory) -> &str {
        match category {
            VocabularyCategory::Project => &self.projects,
            VocabularyCategory::Status => &self.statuses,
            VocabularyCategory::Tag => &self.tags,
            VocabularyCategory::Action => &self.actions,
            VocabularyCategory::Deliverable => &self.deliverables,
        }
    }

    fn normalized(&self) -> Self {
        let pick = |category: VocabularyCategory| {
            normalize_folder_name(self.file_name(category))
                .unwrap_or_else(|| category.default_file_name().to_string())
        };
        Self {
            projects: pick(VocabularyCategory::Project),
            statuses: pick(VocabularyCategory::Status),
            tags: pick(VocabularyCategory::Tag),
            actions: pick(VocabularyCategory::Action),
            deliverables: pick(VocabularyCategory::Deliverable),
        }
    }
}

/// Trims whitespace and leading/trailing slashes; `None` when nothing remains.
pub fn normalize_folder_name(value: &str) -> Option<String> {
    let normalized = value.trim().trim_matches('/').trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Settings load/save errors.
#[derive(Debug)]
pub enum ConfigError {
    Repo(RepoError),
    Parse { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Parse { path, message } => {
                write!(f, "invalid settings file `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Parse { .. } => None,
        }
    }
}

impl From<RepoError> for ConfigError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Loads settings from a JSON file; a missing file yields defaults.
pub fn load_settings(path: &Path) -> Result<LedgerSettings, ConfigError> {
    let Some(raw) = read_optional(path)? else {
        info!("event=settings_load module=config status=skip reason=missing");
        return Ok(LedgerSettings::default());
    };

    let parsed: LedgerSettings =
        serde_json::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    info!("event=settings_load module=config status=ok");
    Ok(parsed.normalized())
}

/// Normalizes and writes settings as pretty JSON.
pub fn save_settings(path: &Path, settings: &LedgerSettings) -> Result<(), ConfigError> {
    let normalized = settings.normalized();
    let mut json = serde_json::to_string_pretty(&normalized).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    json.push('\n');
    write_atomic(path, &json)?;
    info!("event=settings_save module=config status=ok");
    Ok(())
}

/// Absolute locations derived from a vault root and settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerPaths {
    root: PathBuf,
    archive: PathBuf,
    registry_files: RegistryFileNames,
}

impl LedgerPaths {
    pub fn resolve(vault_root: &Path, settings: &LedgerSettings) -> Self {
        let settings = settings.normalized();
        let root = vault_root.join(&settings.root_folder);
        let archive = root.join(&settings.archive_folder_name);
        Self {
            root,
            archive,
            registry_files: settings.registries,
        }
    }

    /// Folder under which the date-partitioned entry tree lives.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    pub fn registry(&self, category: VocabularyCategory) -> PathBuf {
        self.root.join(self.registry_files.file_name(category))
    }

    pub fn registry_file_names(&self) -> &RegistryFileNames {
        &self.registry_files
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_folder_name, LedgerSettings};

    #[test]
    fn normalize_folder_name_strips_slashes_and_whitespace() {
        assert_eq!(
            normalize_folder_name("  /Ledger/Work/ ").as_deref(),
            Some("Ledger/Work")
        );
        assert_eq!(normalize_folder_name(" // "), None);
    }

    #[test]
    fn normalized_reverts_blank_values_to_defaults() {
        let settings = LedgerSettings {
            root_folder: "/".to_string(),
            archive_folder_name: " ".to_string(),
            frontmatter_type: "".to_string(),
            ..LedgerSettings::default()
        };
        assert_eq!(settings.normalized(), LedgerSettings::default());
    }
}
