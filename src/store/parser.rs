//! Line classification for the store's load path
//!
//! One raw input line becomes either a section-header directive or content
//! for the current section. Content is further split into `key=value` pairs
//! and opaque text; opaque text is kept byte-for-byte so the file can be
//! written back without losing comments, blank lines, or anything the
//! classifier did not understand.

/// Strips trailing line terminators (`\n`, `\r\n`).
///
/// Only terminators are removed; trailing spaces inside a value survive.
pub(crate) fn chomp(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// What a single chomped line means to the parse loop.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LineKind<'a> {
    /// `[name]`: switch the current section to `name`.
    Header(&'a str),
    /// Anything else, handed to the current section verbatim.
    Content(&'a str),
}

/// Classifies a chomped line as a header directive or plain content.
///
/// A header must both start with `[` and end with `]`; a dangling `[foo` is
/// ordinary content and survives as an opaque entry.
pub(crate) fn classify(chomped: &str) -> LineKind<'_> {
    if chomped.len() >= 2 && chomped.starts_with('[') && chomped.ends_with(']') {
        LineKind::Header(&chomped[1..chomped.len() - 1])
    } else {
        LineKind::Content(chomped)
    }
}

/// Splits content into a `(key, value)` pair when it has that shape.
///
/// Comment lines (first non-blank character `;` or `#`) and lines without
/// `=` return `None` and stay opaque. Whitespace around the first `=` is
/// trimmed away, so `a = b` and `a=b` name the same key.
pub(crate) fn split_pair(content: &str) -> Option<(&str, &str)> {
    let first = content.trim_start().chars().next()?;
    if first == ';' || first == '#' {
        return None;
    }
    let eq = content.find('=')?;
    let key = content[..eq].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, content[eq + 1..].trim()))
}
