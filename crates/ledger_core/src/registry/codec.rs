//! Pure parse/serialize of registry list artifacts.
//!
//! # Responsibility
//! - Split raw registry text into an opaque header block and ordered items.
//! - Re-encode documents and merge new items without any I/O.
//!
//! # Invariants
//! - Items are unique by `registry_key` (trimmed, lowercased); first casing wins.
//! - The header block is emitted verbatim and never reordered or dropped.
//! - `merge` is idempotent for the same batch of new items.
//! - Encoded output always ends with a newline.

use crate::model::vocabulary::VocabularyCategory;
use std::collections::HashSet;

/// Opening and closing line of a header block.
pub const HEADER_MARKER: &str = "---";
/// Prefix of an item line (checked after trimming the line).
pub const ITEM_PREFIX: &str = "- ";
/// Items starting with this character are comments.
pub const COMMENT_PREFIX: char = '#';
/// Byte order mark some editors put in front of the first line.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// Whether `line` is a header marker line, ignoring a leading byte order mark.
pub(crate) fn is_header_marker(line: &str) -> bool {
    line.trim_start_matches(BYTE_ORDER_MARK).trim() == HEADER_MARKER
}

/// Decoded registry artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDocument {
    /// Header lines including both marker lines, or `None` when absent.
    pub header: Option<Vec<String>>,
    /// Unique items in file order.
    pub items: Vec<String>,
}

impl RegistryDocument {
    pub fn new(header: Option<Vec<String>>) -> Self {
        Self {
            header,
            items: Vec::new(),
        }
    }

    /// Returns the stored display form matching `value` case-insensitively.
    pub fn find(&self, value: &str) -> Option<&str> {
        find_item(&self.items, value)
    }

    /// Appends `value` unless it is blank, a comment, or already present.
    ///
    /// Returns `true` when the item was added.
    pub fn push_unique(&mut self, value: &str) -> bool {
        let Some(item) = normalize_item(value) else {
            return false;
        };
        if self.find(item.as_str()).is_some() {
            return false;
        }
        self.items.push(item);
        true
    }
}

/// Uniqueness key shared by every registry comparison.
pub fn registry_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Case-insensitive lookup over an item slice.
pub fn find_item<'a>(items: &'a [String], value: &str) -> Option<&'a str> {
    let key = registry_key(value);
    items
        .iter()
        .find(|item| registry_key(item) == key)
        .map(String::as_str)
}

/// Parses raw registry text.
///
/// A header is recognized only when the first line is the marker (a byte
/// order mark before it is allowed and kept) and a closing marker follows.
pub fn decode(raw: &str) -> RegistryDocument {
    let lines: Vec<&str> = raw.lines().collect();
    let mut header = None;
    let mut body_start = 0;

    if lines.first().is_some_and(|line| is_header_marker(line)) {
        let closing = lines
            .iter()
            .skip(1)
            .position(|line| line.trim() == HEADER_MARKER)
            .map(|offset| offset + 1);
        // Unlike a scan-to-end reader, an unterminated opening marker is not
        // a header here: items below it stay visible and survive rewrites.
        if let Some(closing) = closing {
            header = Some(
                lines[..=closing]
                    .iter()
                    .map(|line| (*line).to_string())
                    .collect(),
            );
            body_start = closing + 1;
        }
    }

    let mut document = RegistryDocument::new(header);
    for line in &lines[body_start..] {
        let line = line.trim_start_matches(BYTE_ORDER_MARK).trim();
        if let Some(rest) = line.strip_prefix(ITEM_PREFIX) {
            document.push_unique(rest);
        }
    }
    document
}

/// Serializes a document: header lines verbatim, then one item line each.
pub fn encode(document: &RegistryDocument) -> String {
    let mut out = String::new();
    if let Some(header) = &document.header {
        for line in header {
            out.push_str(line);
            out.push('\n');
        }
    }
    for item in &document.items {
        out.push_str(ITEM_PREFIX);
        out.push_str(item);
        out.push('\n');
    }
    if out.is_empty() {
        out.push('\n');
    }
    out
}

/// Merges `new_items` into `existing` and re-encodes.
///
/// An absent artifact is treated as the minimal default template for
/// `category`. New items already present (by key), blank, or comment-like
/// are skipped; the rest are appended in the order given.
pub fn merge(
    existing: Option<&str>,
    category: VocabularyCategory,
    new_items: &[String],
) -> String {
    let mut document = match existing {
        Some(raw) => decode(raw),
        None => RegistryDocument::new(Some(default_header(category))),
    };
    for item in new_items {
        document.push_unique(item);
    }
    encode(&document)
}

/// Returns the items of `new_items` that `merge` would actually append.
pub fn pending_items(existing: &[String], new_items: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = existing.iter().map(|item| registry_key(item)).collect();
    new_items
        .iter()
        .filter_map(|item| normalize_item(item))
        .filter(|item| seen.insert(registry_key(item)))
        .collect()
}

/// Minimal header written when no template exists for a fresh registry.
pub fn default_header(category: VocabularyCategory) -> Vec<String> {
    vec![
        HEADER_MARKER.to_string(),
        "type: creationledger-registry".to_string(),
        format!("registry: {}", category.registry_name()),
        HEADER_MARKER.to_string(),
    ]
}

/// Minimal registry content (header only) for `category`.
pub fn minimal_template(category: VocabularyCategory) -> String {
    encode(&RegistryDocument::new(Some(default_header(category))))
}

fn normalize_item(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) || trimmed.contains(['\n', '\r'])
    {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, merge, pending_items, RegistryDocument};
    use crate::model::vocabulary::VocabularyCategory;

    #[test]
    fn decode_skips_header_comments_and_prose() {
        let raw = "---\ntype: creationledger-registry\n- not an item\n---\n# Heading\n- alpha\n-   \n- # note\n  - beta  \nprose\n";
        let document = decode(raw);
        assert_eq!(document.items, vec!["alpha", "beta"]);
        let header = document.header.expect("header should be detected");
        assert_eq!(header.len(), 4);
        assert_eq!(header[2], "- not an item");
    }

    #[test]
    fn decode_keeps_header_behind_byte_order_mark() {
        let raw = "\u{feff}---\ncssclass: tags\n---\n- writing\n";
        let document = decode(raw);
        assert_eq!(document.items, vec!["writing"]);
        assert_eq!(
            document.header.as_deref().map(|lines| lines[0].as_str()),
            Some("\u{feff}---")
        );

        let plain = decode("\u{feff}- one\n- two\n");
        assert!(plain.header.is_none());
        assert_eq!(plain.items, vec!["one", "two"]);
    }

    #[test]
    fn decode_without_header_scans_from_first_line() {
        let document = decode("- one\n- two\n");
        assert!(document.header.is_none());
        assert_eq!(document.items, vec!["one", "two"]);
    }

    #[test]
    fn decode_treats_unterminated_header_as_body() {
        let document = decode("---\n- one\n");
        assert!(document.header.is_none());
        assert_eq!(document.items, vec!["one"]);
    }

    #[test]
    fn decode_deduplicates_case_insensitively_keeping_first_casing() {
        let document = decode("- Thesis\n- thesis\n- THESIS \n- Blog\n");
        assert_eq!(document.items, vec!["Thesis", "Blog"]);
    }

    #[test]
    fn encode_always_ends_with_newline() {
        assert_eq!(encode(&RegistryDocument::default()), "\n");
        let mut document = RegistryDocument::default();
        document.push_unique("x");
        assert_eq!(encode(&document), "- x\n");
    }

    #[test]
    fn merge_into_absent_artifact_synthesizes_header() {
        let merged = merge(None, VocabularyCategory::Project, &["Thesis".to_string()]);
        assert_eq!(
            merged,
            "---\ntype: creationledger-registry\nregistry: projects\n---\n- Thesis\n"
        );
    }

    #[test]
    fn pending_items_reports_only_unseen_values() {
        let existing = vec!["writing".to_string()];
        let pending = pending_items(
            &existing,
            &[
                "Writing".to_string(),
                "draft".to_string(),
                "DRAFT".to_string(),
                " ".to_string(),
            ],
        );
        assert_eq!(pending, vec!["draft"]);
    }
}
