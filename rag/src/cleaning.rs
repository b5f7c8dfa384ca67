//! Whitespace normalization applied to page text before chunking.

/// Normalizes raw page text.
///
/// - line endings become `\n`
/// - runs of spaces, tabs and other horizontal whitespace collapse to one space
/// - lines are trimmed and blank lines dropped
///
/// An image-only page therefore normalizes to the empty string.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let text = normalize_line_endings(text);
    let mut out = String::with_capacity(text.len());

    for line in text.lines() {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word);
        }
    }

    out
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
