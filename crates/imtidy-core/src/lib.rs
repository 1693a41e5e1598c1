//! Bibliography normalization core
//!
//! Takes parsed `.bib` entries and turns a messy personal bibliography into
//! two curated files: entries whose fields all normalized cleanly, and
//! entries a human still has to touch.
//!
//! The pipeline per entry:
//! - normalize each recognized field (author list, title casing, venue name,
//!   year, entry kind), each producing a value plus a needs-manual-fix flag
//! - derive a canonical cite key `<author><year><titleword>` from the
//!   normalized fields
//! - substitute sentinels for required fields the entry is missing
//! - drop entries whose canonical key was already seen (first occurrence wins)
//! - route the rest to the valid or invalid sink by the aggregate flag

pub mod error;
pub mod key;
pub mod kind;
pub mod normalize;
pub mod pipeline;
pub mod text;
pub mod venues;

pub use error::Error;
pub use key::derive_key;
pub use kind::EntryKind;
pub use normalize::{
    format_author_list, format_author_name, format_title, format_year, FieldResult,
};
pub use pipeline::{
    process_batch, process_entry, tidy_file, BatchOutcome, FormattedEntry, RunSummary,
    MISSING_VALUE,
};
pub use venues::match_venue;
