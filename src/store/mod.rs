//! Order-preserving configuration store
//!
//! `ConfigStore` caches everything it reads: recognized `key=value` pairs
//! become queryable entries, and every other line (comments, blanks,
//! malformed text) is kept verbatim and in position, so a file written back
//! still carries keys and commentary the program never understood. Every
//! operation is gated on [`AccessMode`] capability flags, independent of the
//! permissions of the underlying file.

pub mod mode;
pub(crate) mod parser;
pub mod section;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

pub use mode::AccessMode;
pub use section::{Entry, Section};

/// Failures reported by store operations.
///
/// A missing section or key is not an error; lookups report absence through
/// `Option`/`bool` returns.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A persistent, order-preserving store of config sections.
///
/// Sections stay in the order they were first seen, starting with the
/// implicit anonymous section that collects lines preceding the first
/// `[header]`. Section names are matched case-insensitively (with one
/// deliberate exception, [`ConfigStore::delete_section`]); at most one
/// section exists per name.
#[derive(Debug)]
pub struct ConfigStore {
    sections: Vec<Section>,
    mode: AccessMode,
    reads: u64,
    writes: u64,
}

impl ConfigStore {
    /// Creates an empty store with the given capability flags.
    pub fn new(mode: AccessMode) -> Self {
        ConfigStore {
            sections: Vec::new(),
            mode,
            reads: 0,
            writes: 0,
        }
    }

    /// Replaces the capability flags. Always succeeds.
    pub fn reopen(&mut self, mode: AccessMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Successful read operations so far. Diagnostic only.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Successful write operations so far. Diagnostic only.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Number of sections, the anonymous one included. Not mode-gated.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Iterates sections in stored order. Not mode-gated, like
    /// [`ConfigStore::section_count`].
    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Loads and parses the file at `path`. Requires `FILE_READ`.
    ///
    /// The anonymous section is registered before the open is attempted, so
    /// a failed open still leaves it behind; callers relying on an untouched
    /// store must check the result. After a successful read the medium's
    /// write permission is probed and `FILE_WRITE` is silently dropped from
    /// the mode when the file is read-only.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        if !self.mode.contains(AccessMode::FILE_READ) {
            return Err(StoreError::PermissionDenied(
                "load requires file-read access".to_string(),
            ));
        }
        self.reads += 1;
        let current = self.register_anonymous();
        let file = File::open(path)?;
        self.consume(BufReader::new(file), current)?;
        debug!(
            path = %path.display(),
            sections = self.sections.len(),
            "configuration loaded"
        );

        if let Ok(meta) = fs::metadata(path) {
            if meta.permissions().readonly() && self.mode.contains(AccessMode::FILE_WRITE) {
                warn!(
                    path = %path.display(),
                    "medium is read-only; dropping file-write capability"
                );
                self.mode.remove(AccessMode::FILE_WRITE);
            }
        }
        Ok(())
    }

    /// Parses config text from any buffered reader. Requires `FILE_READ`.
    ///
    /// Same parse semantics as [`ConfigStore::load`], minus the write
    /// permission probe (there is no medium to probe).
    pub fn load_reader(&mut self, reader: impl BufRead) -> Result<(), StoreError> {
        if !self.mode.contains(AccessMode::FILE_READ) {
            return Err(StoreError::PermissionDenied(
                "load requires file-read access".to_string(),
            ));
        }
        self.reads += 1;
        let current = self.register_anonymous();
        self.consume(reader, current)
    }

    /// Writes every section, in stored order, to the file at `path`.
    /// Requires `FILE_WRITE`.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        if !self.mode.contains(AccessMode::FILE_WRITE) {
            return Err(StoreError::PermissionDenied(
                "save requires file-write access".to_string(),
            ));
        }
        // Counted before the open, mirroring the read counter in `load`.
        self.writes += 1;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_sections(&mut writer)?;
        writer.flush()?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Renders every section, in stored order, into `sink`. Requires
    /// `FILE_WRITE`. Does not touch the write counter; only `save` counts.
    pub fn serialize(&self, sink: &mut dyn Write) -> Result<(), StoreError> {
        if !self.mode.contains(AccessMode::FILE_WRITE) {
            return Err(StoreError::PermissionDenied(
                "serialize requires file-write access".to_string(),
            ));
        }
        self.write_sections(sink)?;
        Ok(())
    }

    /// Returns the section named `name` (case-insensitive). Requires `READ`;
    /// a gated call reports `None`, like a missing section.
    pub fn section(&self, name: &str) -> Option<&Section> {
        if !self.mode.contains(AccessMode::READ) {
            return None;
        }
        self.find_section_index(name).map(|i| &self.sections[i])
    }

    /// Looks up `key` in the section named `section`. Requires `READ`.
    ///
    /// `Ok(None)` when either the section or the key is absent.
    pub fn value(&mut self, section: &str, key: &str) -> Result<Option<String>, StoreError> {
        if !self.mode.contains(AccessMode::READ) {
            return Err(StoreError::PermissionDenied(
                "value lookup requires read access".to_string(),
            ));
        }
        self.reads += 1;
        Ok(self
            .find_section_index(section)
            .and_then(|i| self.sections[i].get(key))
            .map(str::to_string))
    }

    /// True when `section` holds `key`. False without `READ` access.
    pub fn has_value(&mut self, section: &str, key: &str) -> bool {
        if !self.mode.contains(AccessMode::READ) {
            return false;
        }
        self.reads += 1;
        self.find_section_index(section)
            .map(|i| self.sections[i].contains_key(key))
            .unwrap_or(false)
    }

    /// Sets `key` to `value` in the section named `section`. Requires
    /// `WRITE`.
    ///
    /// Writing a value identical to the stored one is a no-op that leaves
    /// the write counter alone. A missing section is created and appended at
    /// the end of the stored order.
    pub fn set_value(
        &mut self,
        section: &str,
        key: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        if !self.mode.contains(AccessMode::WRITE) {
            return Err(StoreError::PermissionDenied(
                "set requires write access".to_string(),
            ));
        }
        if let Some(idx) = self.find_section_index(section) {
            if self.sections[idx].get(key) == Some(value) {
                return Ok(());
            }
            self.writes += 1;
            self.sections[idx].set(key, value);
            return Ok(());
        }
        self.writes += 1;
        debug!(section, "creating section for set_value");
        let mut created = Section::new(section);
        created.set(key, value);
        self.sections.push(created);
        Ok(())
    }

    /// Integer convenience for [`ConfigStore::set_value`]; the number is
    /// stored as decimal text.
    pub fn set_int(&mut self, section: &str, key: &str, value: i64) -> Result<(), StoreError> {
        self.set_value(section, key, &value.to_string())
    }

    /// Removes `key` from every section whose name matches `section`
    /// case-insensitively (at most one, by invariant). Requires `WRITE`.
    ///
    /// Counts as a write whether or not anything matched.
    pub fn delete_value(&mut self, section: &str, key: &str) -> Result<(), StoreError> {
        if !self.mode.contains(AccessMode::WRITE) {
            return Err(StoreError::PermissionDenied(
                "delete requires write access".to_string(),
            ));
        }
        self.writes += 1;
        let needle = section.to_lowercase();
        for sect in &mut self.sections {
            if sect.name().to_lowercase() == needle {
                sect.remove(key);
            }
        }
        Ok(())
    }

    /// Removes the first section whose name matches `name` exactly.
    ///
    /// Unlike every other operation, the match is case-sensitive and no mode
    /// flag is consulted. No-op when nothing matches.
    pub fn delete_section(&mut self, name: &str) {
        if let Some(idx) = self.sections.iter().position(|s| s.name() == name) {
            self.sections.remove(idx);
        }
    }

    fn register_anonymous(&mut self) -> usize {
        self.sections.push(Section::anonymous());
        self.sections.len() - 1
    }

    fn consume(&mut self, reader: impl BufRead, mut current: usize) -> Result<(), StoreError> {
        for line in reader.lines() {
            let line = line?;
            current = self.parse_line(&line, current);
        }
        Ok(())
    }

    /// Handles one raw line and returns the index of the section the next
    /// line belongs to.
    fn parse_line(&mut self, raw: &str, current: usize) -> usize {
        let chomped = parser::chomp(raw);
        match parser::classify(chomped) {
            parser::LineKind::Header(name) => match self.find_section_index(name) {
                // A repeated header resumes the section already seen, so
                // duplicates merge instead of shadowing each other.
                Some(idx) => idx,
                None => {
                    self.sections.push(Section::new(name));
                    self.sections.len() - 1
                }
            },
            parser::LineKind::Content(text) => {
                self.sections[current].add_line(text);
                current
            }
        }
    }

    // Unicode-aware case folding, so [Größe] and [größe] name one section.
    fn find_section_index(&self, name: &str) -> Option<usize> {
        let needle = name.to_lowercase();
        self.sections
            .iter()
            .position(|s| s.name().to_lowercase() == needle)
    }

    fn write_sections(&self, sink: &mut dyn Write) -> io::Result<()> {
        for section in &self.sections {
            section.write_to(sink)?;
        }
        Ok(())
    }
}

impl Clone for ConfigStore {
    /// Deep-copies the sections only. The clone starts with an empty mode
    /// and zeroed counters and must be `reopen`ed before gated operations
    /// succeed.
    fn clone(&self) -> Self {
        ConfigStore {
            sections: self.sections.clone(),
            mode: AccessMode::default(),
            reads: 0,
            writes: 0,
        }
    }
}
