use ledger_core::{
    ensure_layout, ensure_registries, BuiltinTemplates, DirTemplates, FsEntryRepository,
    FsRegistryRepository, LedgerPaths, LedgerSettings, RegistryStore, VocabularyCategory,
};

#[test]
fn layout_and_registries_are_created_once() {
    let vault = tempfile::tempdir().unwrap();
    let paths = LedgerPaths::resolve(vault.path(), &LedgerSettings::default());
    let store =
        RegistryStore::new(FsRegistryRepository::new(&paths)).with_templates(BuiltinTemplates);

    ensure_layout(&FsEntryRepository, &paths).unwrap();
    assert!(paths.root().is_dir());
    assert!(paths.archive().is_dir());

    let first = ensure_registries(&store);
    assert!(first.is_ok());
    assert_eq!(first.created, VocabularyCategory::ALL.to_vec());
    assert_eq!(
        store.load(VocabularyCategory::Status),
        vec!["todo", "in-progress", "blocked", "done", "paused"]
    );
    assert!(store.load(VocabularyCategory::Action).is_empty());

    let second = ensure_registries(&store);
    assert!(second.created.is_empty());
    assert_eq!(second.existing, VocabularyCategory::ALL.to_vec());
    ensure_layout(&FsEntryRepository, &paths).unwrap();
}

#[test]
fn existing_registries_are_left_untouched() {
    let vault = tempfile::tempdir().unwrap();
    let paths = LedgerPaths::resolve(vault.path(), &LedgerSettings::default());
    let statuses = paths.registry(VocabularyCategory::Status);
    std::fs::create_dir_all(statuses.parent().unwrap()).unwrap();
    std::fs::write(&statuses, "custom prose\n- open\n").unwrap();

    let store =
        RegistryStore::new(FsRegistryRepository::new(&paths)).with_templates(BuiltinTemplates);
    let report = ensure_registries(&store);

    assert!(report.existing.contains(&VocabularyCategory::Status));
    assert_eq!(
        std::fs::read_to_string(&statuses).unwrap(),
        "custom prose\n- open\n"
    );
}

#[test]
fn directory_templates_seed_new_registries() {
    let vault = tempfile::tempdir().unwrap();
    let templates = tempfile::tempdir().unwrap();
    std::fs::write(
        templates.path().join("_projects.md"),
        "---\nregistry: projects\n---\n- Thesis\n",
    )
    .unwrap();

    let paths = LedgerPaths::resolve(vault.path(), &LedgerSettings::default());
    let store = RegistryStore::new(FsRegistryRepository::new(&paths)).with_templates(
        DirTemplates::new(templates.path(), paths.registry_file_names().clone()),
    );
    let report = ensure_registries(&store);

    assert!(report.is_ok());
    assert_eq!(store.load(VocabularyCategory::Project), vec!["Thesis"]);
    let tags = std::fs::read_to_string(paths.registry(VocabularyCategory::Tag)).unwrap();
    assert_eq!(
        tags,
        "---\ntype: creationledger-registry\nregistry: tags\n---\n"
    );
}

#[test]
fn blocked_registry_is_reported_without_stopping_others() {
    let vault = tempfile::tempdir().unwrap();
    let paths = LedgerPaths::resolve(vault.path(), &LedgerSettings::default());
    std::fs::create_dir_all(paths.registry(VocabularyCategory::Tag)).unwrap();

    let store = RegistryStore::new(FsRegistryRepository::new(&paths));
    let report = ensure_registries(&store);

    assert!(!report.is_ok());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, VocabularyCategory::Tag);
    assert_eq!(report.created.len(), 4);
}
