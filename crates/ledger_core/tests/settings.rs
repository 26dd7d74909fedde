use ledger_core::{
    load_settings, save_settings, ConfigError, LedgerPaths, LedgerSettings, VocabularyCategory,
};

#[test]
fn missing_settings_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = load_settings(&dir.path().join(".ledger.json")).unwrap();
    assert_eq!(settings, LedgerSettings::default());
    assert_eq!(settings.root_folder, "CreationLedger");
    assert_eq!(settings.registries.statuses, "_statuses.md");
}

#[test]
fn partial_settings_are_filled_and_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".ledger.json");
    std::fs::write(
        &path,
        r#"{ "rootFolder": " /Journal/Ledger/ ", "frontmatterType": "  ", "registries": { "tags": "lists/_tags.md", "projects": "" } }"#,
    )
    .unwrap();

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.root_folder, "Journal/Ledger");
    assert_eq!(settings.archive_folder_name, "archive");
    assert_eq!(settings.frontmatter_type, "creation-ledger");
    assert_eq!(settings.registries.tags, "lists/_tags.md");
    assert_eq!(settings.registries.projects, "_projects.md");
}

#[test]
fn saved_settings_load_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config/.ledger.json");
    let mut settings = LedgerSettings::default();
    settings.root_folder = "Work".to_string();
    settings.registries.statuses = "_states.md".to_string();

    save_settings(&path, &settings).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"rootFolder\": \"Work\""));
    assert_eq!(load_settings(&path).unwrap(), settings);
}

#[test]
fn malformed_settings_report_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".ledger.json");
    std::fs::write(&path, "{ not json").unwrap();
    let err = load_settings(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(".ledger.json"));
}

#[test]
fn paths_resolve_under_vault_root() {
    let mut settings = LedgerSettings::default();
    settings.registries.tags = "lists/_tags.md".to_string();
    let paths = LedgerPaths::resolve(std::path::Path::new("/vault"), &settings);

    assert_eq!(paths.root(), std::path::Path::new("/vault/CreationLedger"));
    assert_eq!(
        paths.archive(),
        std::path::Path::new("/vault/CreationLedger/archive")
    );
    assert_eq!(
        paths.registry(VocabularyCategory::Tag),
        std::path::Path::new("/vault/CreationLedger/lists/_tags.md")
    );
    assert_eq!(
        paths.registry(VocabularyCategory::Deliverable),
        std::path::Path::new("/vault/CreationLedger/_deliverables.md")
    );
}
