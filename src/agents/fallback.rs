//! Permissive frontmatter parser for flat `key: value` pairs.
//!
//! Anything beyond flat pairs (nested mappings, lists, block scalars, flow
//! collections) is skipped and reported, never treated as a hard error.

use serde_yaml::{Mapping, Value};

/// A frontmatter line the flat parser did not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the file (the opening `---` is line 1)
    pub line: usize,
    pub reason: &'static str,
}

/// Parse `raw` as flat `key: value` pairs.
///
/// Matching surrounding quotes are stripped. A key with no value maps to
/// null. When a key repeats, the last occurrence wins.
pub fn parse_flat(raw: &str) -> (Mapping, Vec<SkippedLine>) {
    let mut mapping = Mapping::new();
    let mut skipped = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 2;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            skipped.push(SkippedLine {
                line: line_no,
                reason: "indented or continuation line",
            });
            continue;
        }

        if trimmed == "-" || trimmed.starts_with("- ") {
            skipped.push(SkippedLine {
                line: line_no,
                reason: "list item",
            });
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            skipped.push(SkippedLine {
                line: line_no,
                reason: "not a key: value pair",
            });
            continue;
        };

        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            skipped.push(SkippedLine {
                line: line_no,
                reason: "empty key",
            });
            continue;
        }

        if value.starts_with('|') || value.starts_with('>') {
            skipped.push(SkippedLine {
                line: line_no,
                reason: "block scalar",
            });
            continue;
        }

        if value.starts_with('[') || value.starts_with('{') {
            skipped.push(SkippedLine {
                line: line_no,
                reason: "flow collection",
            });
            continue;
        }

        let value = if value.is_empty() {
            Value::Null
        } else {
            Value::String(unquote(value).to_string())
        };

        mapping.insert(Value::String(key.to_string()), value);
    }

    (mapping, skipped)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
