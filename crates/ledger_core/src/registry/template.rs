//! Seed content for registry artifacts created on demand.

use crate::config::RegistryFileNames;
use crate::model::vocabulary::VocabularyCategory;
use crate::repo::read_optional;
use log::warn;
use std::path::PathBuf;

/// Supplies the initial text of a registry that does not exist yet.
pub trait TemplateSource {
    /// Returns template text, or `None` when no template is available.
    fn template(&self, category: VocabularyCategory) -> Option<String>;
}

/// Templates compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateSource for BuiltinTemplates {
    fn template(&self, category: VocabularyCategory) -> Option<String> {
        let text = match category {
            VocabularyCategory::Project => include_str!("../../templates/_projects.md"),
            VocabularyCategory::Status => include_str!("../../templates/_statuses.md"),
            VocabularyCategory::Tag => include_str!("../../templates/_tags.md"),
            VocabularyCategory::Action => include_str!("../../templates/_actions.md"),
            VocabularyCategory::Deliverable => include_str!("../../templates/_deliverables.md"),
        };
        Some(text.to_string())
    }
}

/// Templates read from `<dir>/<registry file name>`, e.g. a host's bundled assets.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    dir: PathBuf,
    file_names: RegistryFileNames,
}

impl DirTemplates {
    pub fn new(dir: impl Into<PathBuf>, file_names: RegistryFileNames) -> Self {
        Self {
            dir: dir.into(),
            file_names,
        }
    }
}

impl TemplateSource for DirTemplates {
    fn template(&self, category: VocabularyCategory) -> Option<String> {
        let path = self.dir.join(self.file_names.file_name(category));
        match read_optional(&path) {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    "event=template_read module=registry status=error category={} error={}",
                    category, err
                );
                None
            }
        }
    }
}

/// No templates; fresh registries get the minimal default header.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl TemplateSource for NoTemplates {
    fn template(&self, _category: VocabularyCategory) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{BuiltinTemplates, DirTemplates, TemplateSource};
    use crate::config::RegistryFileNames;
    use crate::model::vocabulary::VocabularyCategory;
    use crate::registry::codec::decode;

    #[test]
    fn builtin_status_template_seeds_default_statuses() {
        let text = BuiltinTemplates
            .template(VocabularyCategory::Status)
            .unwrap();
        let document = decode(&text);
        assert!(document.header.is_some());
        assert_eq!(
            document.items,
            vec!["todo", "in-progress", "blocked", "done", "paused"]
        );
    }

    #[test]
    fn builtin_templates_name_their_registry() {
        for category in VocabularyCategory::ALL {
            let text = BuiltinTemplates.template(category).unwrap();
            assert!(text.contains(&format!("registry: {}", category.registry_name())));
        }
    }

    #[test]
    fn dir_templates_return_none_for_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("_tags.md"), "- seeded\n").unwrap();
        let templates = DirTemplates::new(dir.path(), RegistryFileNames::default());
        assert_eq!(
            templates.template(VocabularyCategory::Tag).as_deref(),
            Some("- seeded\n")
        );
        assert!(templates.template(VocabularyCategory::Project).is_none());
    }
}
