//! confkeep - order-preserving configuration store
//!
//! Most config libraries forget keys and comments they don't understand.
//! confkeep caches everything: a parsed file can be mutated selectively and
//! written back with every comment, blank line, and unknown key still in
//! place.
//!
//! ## Config format
//!
//! Line-oriented, INI-like text:
//!
//! ```plain,ignore
//! ; header comment, preserved verbatim
//! [zdl.general]
//! port=gzdoom
//! skill=4
//!
//! [zdl.save]
//! iwad=doom2.wad
//! ```
//!
//! Lines before the first `[header]` belong to an implicit anonymous
//! section. A repeated header resumes the earlier section instead of
//! creating a second one. Section names match case-insensitively; keys match
//! exactly.

pub mod cli;
pub mod logging;
pub mod store;

pub use store::{AccessMode, ConfigStore, Entry, Section, StoreError};

/// Result type alias for confkeep operations
pub type Result<T> = anyhow::Result<T>;
