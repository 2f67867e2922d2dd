//! Access-mode capability flags for the configuration store
//!
//! Every store operation is gated on these flags rather than on the actual
//! permissions of the underlying file, so a caller can hand out a read-only
//! view of a writable file or stage writes against a store that will never
//! touch disk.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Combinable capability flags gating store operations.
///
/// `READ`/`WRITE` gate in-memory queries and mutation; `FILE_READ`/
/// `FILE_WRITE` gate `load` and `save` against the physical medium. Combine
/// with `|`:
///
/// ```
/// use confkeep::AccessMode;
///
/// let mode = AccessMode::READ | AccessMode::FILE_READ;
/// assert!(mode.contains(AccessMode::READ));
/// assert!(!mode.contains(AccessMode::WRITE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessMode {
    bits: u8,
}

impl AccessMode {
    /// In-memory queries (`value`, `has_value`, `section`) permitted.
    pub const READ: AccessMode = AccessMode { bits: 0b0001 };
    /// In-memory mutation (`set_value`, `delete_value`) permitted.
    pub const WRITE: AccessMode = AccessMode { bits: 0b0010 };
    /// Loading from the physical medium permitted.
    pub const FILE_READ: AccessMode = AccessMode { bits: 0b0100 };
    /// Saving to the physical medium permitted.
    pub const FILE_WRITE: AccessMode = AccessMode { bits: 0b1000 };

    /// No capabilities at all. Every gated operation is refused.
    pub const NONE: AccessMode = AccessMode { bits: 0 };

    /// All four capabilities.
    pub fn all() -> AccessMode {
        Self::READ | Self::WRITE | Self::FILE_READ | Self::FILE_WRITE
    }

    /// True when every flag in `other` is also set in `self`.
    pub fn contains(self, other: AccessMode) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Clears the flags in `other`.
    pub fn remove(&mut self, other: AccessMode) {
        self.bits &= !other.bits;
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }
}

impl BitOr for AccessMode {
    type Output = AccessMode;

    fn bitor(self, rhs: AccessMode) -> AccessMode {
        AccessMode {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for AccessMode {
    fn bitor_assign(&mut self, rhs: AccessMode) {
        self.bits |= rhs.bits;
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::READ) {
            names.push("read");
        }
        if self.contains(Self::WRITE) {
            names.push("write");
        }
        if self.contains(Self::FILE_READ) {
            names.push("file-read");
        }
        if self.contains(Self::FILE_WRITE) {
            names.push("file-write");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}
