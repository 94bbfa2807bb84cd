//! Text transforms applied to placeholder content.

use crate::settings::InlineSeparator;

/// Paragraph break as understood by the host text model.
pub const PARAGRAPH_BREAK: &str = "\r";

/// Replace every literal occurrence of `delimiter` with a paragraph break.
///
/// Matching is literal, so regex-special characters such as `|` or `.`
/// need no escaping. Empty text and an empty delimiter are no-ops.
pub fn apply_line_breaks(text: &str, delimiter: &str) -> String {
    if text.is_empty() || delimiter.is_empty() {
        return text.to_string();
    }
    text.replace(delimiter, PARAGRAPH_BREAK)
}

/// Split a raw chairperson cell on `||`, trimming and dropping empty pieces.
pub fn split_chairs(raw: &str) -> Vec<String> {
    raw.split("||")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join chair names for inline mode.
pub fn join_inline(names: &[String], separator: InlineSeparator) -> String {
    match separator {
        InlineSeparator::Comma => names.join(", "),
        InlineSeparator::Linebreak => names.join(PARAGRAPH_BREAK),
    }
}
