//! Entry header/body rendering.
//!
//! # Invariants
//! - Required header keys (`type`, `date`, `time`, `datetime`) are always present.
//! - Optional keys appear only with non-empty values, in fixed order.
//! - Header values are single-line.

use crate::model::entry::EntryFields;
use crate::registry::codec::HEADER_MARKER;
use chrono::NaiveDateTime;

/// Prefix of every tag token in the entry body.
pub const TAG_PREFIX: &str = "#tag/";

/// Renders the full text of a new entry.
pub fn build_entry(
    fields: &EntryFields,
    timestamp: NaiveDateTime,
    frontmatter_type: &str,
) -> String {
    let date = timestamp.format("%Y-%m-%d").to_string();
    let time = timestamp.format("%H:%M:%S").to_string();

    let datetime = format!("{date}T{time}");
    let mut header = vec![
        ("type", header_value(frontmatter_type)),
        ("date", date),
        ("time", time),
        ("datetime", datetime),
    ];

    let optional = [
        ("project", fields.project.as_deref()),
        ("status", Some(fields.status.as_str())),
        ("category", fields.category.as_deref()),
        ("action", fields.action.as_deref()),
        ("deliverable", fields.deliverable.as_deref()),
    ];
    for (key, value) in optional {
        let Some(value) = value.map(header_value).filter(|v| !v.is_empty()) else {
            continue;
        };
        header.push((key, value));
    }

    let mut out = String::new();
    out.push_str(HEADER_MARKER);
    out.push('\n');
    for (key, value) in &header {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(HEADER_MARKER);
    out.push_str("\n\n");
    out.push_str(&build_body(&fields.tags, fields.notes.as_deref()));
    out
}

/// Tag line, blank separator, trimmed notes; each part only when present.
pub fn build_body(tags: &[String], notes: Option<&str>) -> String {
    let mut seen = Vec::<&str>::new();
    for tag in tags.iter().map(|tag| tag.trim()).filter(|tag| !tag.is_empty()) {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }

    let mut body = String::new();
    if !seen.is_empty() {
        let line = seen
            .iter()
            .map(|tag| format!("{TAG_PREFIX}{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        body.push_str(&line);
        body.push('\n');
    }

    let notes = notes.map(str::trim).unwrap_or("");
    if !notes.is_empty() {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(notes);
        body.push('\n');
    }
    body
}

fn header_value(value: &str) -> String {
    value.replace(['\n', '\r'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{build_body, build_entry};
    use crate::model::entry::EntryFields;
    use chrono::NaiveDate;

    fn fields() -> EntryFields {
        EntryFields {
            title: "Draft outline".to_string(),
            project: None,
            status: "in-progress".to_string(),
            category: None,
            action: None,
            deliverable: None,
            tags: Vec::new(),
            notes: None,
        }
    }

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn minimal_entry_has_required_keys_and_status_only() {
        let text = build_entry(&fields(), timestamp(), "creation-ledger");
        assert_eq!(
            text,
            "---\ntype: creation-ledger\ndate: 2025-01-02\ntime: 03:04:05\ndatetime: 2025-01-02T03:04:05\nstatus: in-progress\n---\n\n"
        );
    }

    #[test]
    fn optional_keys_follow_fixed_order_and_skip_blanks() {
        let mut f = fields();
        f.deliverable = Some("chapter".to_string());
        f.project = Some("Thesis".to_string());
        f.category = Some("  ".to_string());
        f.action = Some("drafted".to_string());
        let text = build_entry(&f, timestamp(), "creation-ledger");

        let keys: Vec<&str> = text
            .lines()
            .skip(1)
            .take_while(|line| *line != "---")
            .filter_map(|line| line.split(':').next())
            .collect();
        assert_eq!(
            keys,
            vec!["type", "date", "time", "datetime", "project", "status", "action", "deliverable"]
        );
    }

    #[test]
    fn body_separates_tags_and_notes_with_blank_line() {
        let tags = vec!["writing".to_string(), "draft".to_string(), "writing".to_string()];
        assert_eq!(
            build_body(&tags, Some("  first pass \n")),
            "#tag/writing #tag/draft\n\nfirst pass\n"
        );
        assert_eq!(build_body(&tags, None), "#tag/writing #tag/draft\n");
        assert_eq!(build_body(&[], Some("only notes")), "only notes\n");
        assert_eq!(build_body(&[], Some("   ")), "");
    }
}
