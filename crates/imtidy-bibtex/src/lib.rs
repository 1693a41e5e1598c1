//! BibTeX parsing and record serialization
//!
//! This crate is the file-format boundary of the imtidy suite: it parses a
//! `.bib` database into raw entries and serializes processed records back to
//! `@type{key, field={value},...}` form.
//!
//! Features:
//! - Nom-based parser for robust BibTeX parsing
//! - @string expansion and # concatenation
//! - Per-entry error recovery (a malformed entry never aborts the file)
//! - Record writer with a manual-fix marker per field line

mod entry;
pub mod parser;
mod writer;

pub use entry::{RawEntry, RawField};
pub use parser::{parse_file, BibFile, ParseIssue};
pub use writer::{format_record, format_records, Record, RecordField};
