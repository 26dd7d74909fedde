//! In-place edits of an entry's header block.
//!
//! Only the targeted `key: value` line changes; every other byte of the
//! header and body is preserved, including line endings.

use crate::registry::codec::{is_header_marker, BYTE_ORDER_MARK, HEADER_MARKER};

/// Byte ranges of a header block inside an entry text.
struct HeaderSpan {
    /// Offset just past the opening marker line.
    body_start: usize,
    /// Offset of the closing marker line.
    closing_start: usize,
}

fn find_header(content: &str) -> Option<HeaderSpan> {
    let mut offset = 0;
    let mut opened_at = None;
    for line in content.split_inclusive('\n') {
        let is_marker = if offset == 0 {
            is_header_marker(line)
        } else {
            line.trim() == HEADER_MARKER
        };
        if is_marker {
            match opened_at {
                None if offset == 0 => opened_at = Some(offset + line.len()),
                Some(body_start) => {
                    return Some(HeaderSpan {
                        body_start,
                        closing_start: offset,
                    })
                }
                None => return None,
            }
        } else if opened_at.is_none() {
            return None;
        }
        offset += line.len();
    }
    None
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Reads `key` from the header block, if present and non-empty.
pub fn read_header_value(content: &str, key: &str) -> Option<String> {
    let span = find_header(content)?;
    content[span.body_start..span.closing_start]
        .lines()
        .filter_map(split_key_value)
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| value.trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|value| !value.is_empty())
}

/// Sets `key` to `value` in the header block.
///
/// Replaces the first existing `key:` line, otherwise inserts the key just
/// before the closing marker. Text without a header gets a new header
/// holding only this key.
pub fn set_header_value(content: &str, key: &str, value: &str) -> String {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let rendered = format!("{key}: {value}");

    let Some(span) = find_header(content) else {
        let body = content.trim_start_matches(BYTE_ORDER_MARK);
        let bom = &content[..content.len() - body.len()];
        return format!(
            "{bom}{HEADER_MARKER}{newline}{rendered}{newline}{HEADER_MARKER}{newline}{body}"
        );
    };

    let mut offset = span.body_start;
    for line in content[span.body_start..span.closing_start].split_inclusive('\n') {
        let matches_key = split_key_value(line).is_some_and(|(candidate, _)| candidate == key);
        if matches_key {
            let ending = &line[line.trim_end_matches(['\r', '\n']).len()..];
            let mut out = String::with_capacity(content.len() + value.len());
            out.push_str(&content[..offset]);
            out.push_str(&rendered);
            out.push_str(ending);
            out.push_str(&content[offset + line.len()..]);
            return out;
        }
        offset += line.len();
    }

    let mut out = String::with_capacity(content.len() + rendered.len() + 2);
    out.push_str(&content[..span.closing_start]);
    out.push_str(&rendered);
    out.push_str(newline);
    out.push_str(&content[span.closing_start..]);
    out
}
