use ledger_core::registry::codec::{decode, encode, merge, RegistryDocument};
use ledger_core::VocabularyCategory;

const SAMPLES: &[&str] = &[
    "",
    "\n\n",
    "- solo",
    "---\ntype: creationledger-registry\nregistry: tags\n---\n- writing\n- Research\n- research\n",
    "---\r\ntitle: windows\r\n---\r\n- one\r\n- two\r\n",
    "# Projects\n\nSome prose.\n- Thesis\n  - Blog  \n- # commented\n-\n- \n",
    "---\nunterminated: header\n- still parsed\n",
    "---\n---\n- empty header\n",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn decode_encode_roundtrip_is_stable_for_all_samples() {
    for sample in SAMPLES {
        let first = decode(sample);
        let second = decode(&encode(&first));
        assert_eq!(first, second, "unstable roundtrip for {sample:?}");
    }
}

#[test]
fn merge_keeps_existing_order_then_appends_unseen_in_batch_order() {
    let existing = "---\nregistry: projects\n---\n- Thesis\n- Blog\n";
    let merged = merge(
        Some(existing),
        VocabularyCategory::Project,
        &strings(&["Podcast", "blog", "Zine", "podcast", "THESIS"]),
    );
    let document = decode(&merged);
    assert_eq!(document.items, vec!["Thesis", "Blog", "Podcast", "Zine"]);
    assert_eq!(
        document.header,
        Some(strings(&["---", "registry: projects", "---"]))
    );
}

#[test]
fn merge_is_idempotent() {
    let batch = strings(&["writing", "Draft", "draft", "research"]);
    for sample in SAMPLES {
        let once = merge(Some(sample), VocabularyCategory::Tag, &batch);
        let twice = merge(Some(&once), VocabularyCategory::Tag, &batch);
        assert_eq!(once, twice, "merge not idempotent for {sample:?}");
    }
}

#[test]
fn merge_preserves_header_verbatim_and_drops_prose() {
    let existing = "---\ntype: creationledger-registry\nnote:   spaced   value  \n---\nintro line\n- a\n";
    let merged = merge(Some(existing), VocabularyCategory::Tag, &strings(&["b"]));
    assert_eq!(
        merged,
        "---\ntype: creationledger-registry\nnote:   spaced   value  \n---\n- a\n- b\n"
    );
}

#[test]
fn merge_without_header_does_not_invent_one() {
    let merged = merge(Some("- a\n"), VocabularyCategory::Tag, &strings(&["b"]));
    assert_eq!(merged, "- a\n- b\n");
}

#[test]
fn merge_skips_blank_and_comment_values() {
    let merged = merge(
        Some("- a\n"),
        VocabularyCategory::Tag,
        &strings(&["  ", "#hidden", "multi\nline", " c "]),
    );
    assert_eq!(merged, "- a\n- c\n");
}

#[test]
fn encode_emits_header_then_items() {
    let document = RegistryDocument {
        header: Some(strings(&["---", "registry: statuses", "---"])),
        items: strings(&["todo", "done"]),
    };
    assert_eq!(encode(&document), "---\nregistry: statuses\n---\n- todo\n- done\n");
}
