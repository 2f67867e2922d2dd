//! A named (or anonymous) ordered group of config lines
//!
//! Sections own everything between one `[header]` and the next: recognized
//! `key=value` pairs that can be looked up and rewritten, interleaved with
//! opaque lines (comments, blanks, text the parser did not understand) that
//! are reproduced exactly where they were read.

use std::io::{self, Write};

use crate::store::parser;

/// One stored line: a queryable pair or verbatim text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A recognized `key=value` assignment.
    Pair { key: String, value: String },
    /// Anything else, kept byte-for-byte for round-trip output.
    Opaque(String),
}

/// An ordered container of entries under one section name.
///
/// The anonymous section (empty name, `nameless` flag) collects lines that
/// precede the first bracketed header and never emits a header of its own.
/// Key matching inside a section is exact; the case-insensitive matching the
/// store applies to section names does not extend to keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    nameless: bool,
    entries: Vec<Entry>,
}

impl Section {
    /// Creates an empty named section.
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            nameless: false,
            entries: Vec::new(),
        }
    }

    /// Creates the anonymous section that holds pre-header lines.
    pub fn anonymous() -> Self {
        Section {
            name: String::new(),
            nameless: true,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for the implicit section serialized without a header line.
    pub fn is_anonymous(&self) -> bool {
        self.nameless
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of keyed entries, ignoring opaque lines.
    pub fn key_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Pair { .. }))
            .count()
    }

    /// Appends one raw line, classifying it as a pair or opaque text.
    ///
    /// Recognition is delegated to the shared parser so the load path and
    /// direct callers agree on what counts as an assignment.
    pub fn add_line(&mut self, text: &str) {
        match parser::split_pair(text) {
            Some((key, value)) => self.entries.push(Entry::Pair {
                key: key.to_string(),
                value: value.to_string(),
            }),
            None => self.entries.push(Entry::Opaque(text.to_string())),
        }
    }

    /// Returns the value stored under `key`, if any. Exact key match.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Pair { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`.
    ///
    /// An existing pair is updated in place, keeping its position among the
    /// other entries; a new pair is appended at the end.
    pub fn set(&mut self, key: &str, value: &str) {
        for entry in &mut self.entries {
            if let Entry::Pair { key: k, value: v } = entry {
                if k == key {
                    *v = value.to_string();
                    return;
                }
            }
        }
        self.entries.push(Entry::Pair {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    /// Removes the pair stored under `key`. Opaque entries are untouched.
    ///
    /// Returns true when a pair was actually removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| !matches!(entry, Entry::Pair { key: k, .. } if k == key));
        self.entries.len() != before
    }

    /// Renders this section back to text.
    ///
    /// Named sections emit their `[name]` header first; the anonymous section
    /// emits none. Entries follow in stored order, pairs as `key=value` and
    /// opaque lines exactly as read.
    pub fn write_to(&self, sink: &mut dyn Write) -> io::Result<()> {
        if !self.nameless {
            writeln!(sink, "[{}]", self.name)?;
        }
        for entry in &self.entries {
            match entry {
                Entry::Pair { key, value } => writeln!(sink, "{}={}", key, value)?,
                Entry::Opaque(text) => writeln!(sink, "{}", text)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(section: &Section) -> String {
        let mut buf = Vec::new();
        section.write_to(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_add_line_classifies_pairs_and_opaque() {
        let mut section = Section::new("zdl.save");
        section.add_line("iwad=doom2.wad");
        section.add_line("; warp straight in");
        section.add_line("");
        section.add_line("skill=4");

        assert_eq!(section.entry_count(), 4);
        assert_eq!(section.key_count(), 2);
        assert_eq!(section.get("iwad"), Some("doom2.wad"));
        assert_eq!(section.get("skill"), Some("4"));
    }

    #[test]
    fn test_get_is_exact_match() {
        let mut section = Section::new("general");
        section.set("Port", "gzdoom");
        assert_eq!(section.get("Port"), Some("gzdoom"));
        assert_eq!(section.get("port"), None);
    }

    #[test]
    fn test_set_updates_in_place() {
        let mut section = Section::new("general");
        section.add_line("first=1");
        section.add_line("; comment between");
        section.add_line("second=2");

        section.set("first", "updated");
        assert_eq!(section.get("first"), Some("updated"));

        // Position among entries is preserved.
        assert_eq!(
            render(&section),
            "[general]\nfirst=updated\n; comment between\nsecond=2\n"
        );
    }

    #[test]
    fn test_set_appends_missing_key() {
        let mut section = Section::new("general");
        section.add_line("; lonely comment");
        section.set("fresh", "value");
        assert_eq!(
            render(&section),
            "[general]\n; lonely comment\nfresh=value\n"
        );
    }

    #[test]
    fn test_remove_leaves_other_entries_alone() {
        let mut section = Section::new("general");
        section.add_line("keep=1");
        section.add_line("; opaque stays");
        section.add_line("drop=2");

        assert!(section.remove("drop"));
        assert!(!section.remove("drop"));
        assert!(section.contains_key("keep"));
        assert_eq!(render(&section), "[general]\nkeep=1\n; opaque stays\n");
    }

    #[test]
    fn test_anonymous_section_emits_no_header() {
        let mut section = Section::anonymous();
        section.add_line("; file-level comment");
        section.add_line("stray=value");

        assert!(section.is_anonymous());
        assert_eq!(render(&section), "; file-level comment\nstray=value\n");
    }

    #[test]
    fn test_blank_lines_round_trip() {
        let mut section = Section::new("spacing");
        section.add_line("");
        section.add_line("key=value");
        section.add_line("");
        assert_eq!(render(&section), "[spacing]\n\nkey=value\n\n");
    }
}
