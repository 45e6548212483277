//! Splitting a Markdown document into its frontmatter block and body.

use crate::error::ParseError;

const DELIMITER: &str = "---";

/// A document split at its `---` delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Raw text between the delimiters, without the delimiter lines
    pub frontmatter: String,

    /// Everything after the closing delimiter, trimmed
    pub body: String,
}

/// Split `content` into frontmatter and body.
///
/// The first line must be `---` and the block ends at the next line that is
/// exactly `---`. Trailing whitespace on delimiter lines is tolerated.
pub fn split(content: &str) -> Result<Document, ParseError> {
    let normalized = content.replace("\r\n", "\n");
    let normalized = normalized.strip_prefix('\u{feff}').unwrap_or(&normalized);
    let mut lines = normalized.lines();

    match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => {}
        _ => return Err(ParseError::MissingFrontmatter),
    }

    let mut frontmatter_lines = Vec::new();
    let mut found_end = false;
    for line in lines.by_ref() {
        if line.trim_end() == DELIMITER {
            found_end = true;
            break;
        }
        frontmatter_lines.push(line);
    }

    if !found_end {
        return Err(ParseError::Unterminated);
    }

    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    Ok(Document {
        frontmatter: frontmatter_lines.join("\n"),
        body,
    })
}
