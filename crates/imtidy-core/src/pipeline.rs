//! Entry orchestration, deduplication, and sink routing
//!
//! [`process_entry`] runs the per-field formatters over one raw entry and
//! assembles a [`FormattedEntry`]; [`process_batch`] adds the seen-key
//! registry and routes each survivor to the valid or invalid set;
//! [`tidy_file`] wraps one full run including the file I/O.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use imtidy_bibtex::{format_records, parse_file, RawEntry, Record, RecordField};

use crate::error::Error;
use crate::key::derive_key;
use crate::kind::EntryKind;
use crate::normalize::{format_author_list, format_title, format_year, FieldResult};
use crate::venues::match_venue;

/// Placeholder substituted for a required field the entry does not carry
pub const MISSING_VALUE: &str = "<Missing>";

/// One fully normalized entry plus its aggregate manual-fix flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedEntry {
    pub kind: EntryKind,
    /// Canonical cite key, or the source key (flagged) when underivable
    pub key: FieldResult,
    /// Recognized fields in source order, then any missing-field sentinels
    pub fields: Vec<(String, FieldResult)>,
    /// True iff any field is flagged, a required field was missing, or the
    /// canonical key fell back to the source key
    pub needs_fix: bool,
}

impl FormattedEntry {
    /// Look up a formatted field by (lowercase) name
    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    fn to_record(&self) -> Record {
        Record {
            kind: self.kind.as_str().to_string(),
            key: self.key.value.clone(),
            fields: self
                .fields
                .iter()
                .map(|(name, result)| RecordField {
                    name: name.clone(),
                    value: result.value.clone(),
                    needs_fix: result.needs_fix,
                })
                .collect(),
        }
    }
}

/// The split output of one batch run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub valid: Vec<FormattedEntry>,
    pub invalid: Vec<FormattedEntry>,
    /// Entries dropped because their canonical key was already seen
    pub duplicates_dropped: usize,
}

impl BatchOutcome {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            valid: self.valid.len(),
            invalid: self.invalid.len(),
            duplicates: self.duplicates_dropped,
        }
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub valid: usize,
    pub invalid: usize,
    pub duplicates: usize,
}

/// Normalize one raw entry.
///
/// Recognized fields are dispatched to their formatters; anything else is
/// dropped from the processed result. The canonical key is derived only when
/// title, author, and year are all present and individually clean; otherwise
/// the source key is kept, flagged, which forces the entry into the invalid
/// set. Required fields the entry lacks come back as flagged
/// [`MISSING_VALUE`] sentinels.
pub fn process_entry(raw: &RawEntry) -> FormattedEntry {
    let kind = EntryKind::from_field(&raw.entry_type);

    let mut fields: Vec<(String, FieldResult)> = Vec::new();
    let mut needs_fix = false;

    for field in &raw.fields {
        let name = field.name.to_lowercase();
        let formatted = match name.as_str() {
            "author" => Some(format_author_list(&field.value)),
            "booktitle" | "journal" => Some(match_venue(&field.value)),
            "year" => Some(format_year(&field.value)),
            "title" => Some(format_title(&field.value)),
            _ => None, // unsupported fields are dropped
        };

        if let Some(result) = formatted {
            needs_fix |= result.needs_fix;
            fields.push((name, result));
        }
    }

    let key = canonical_key(raw, &fields);
    needs_fix |= key.needs_fix;

    for &required in kind.required_fields() {
        if !fields.iter().any(|(name, _)| name == required) {
            fields.push((required.to_string(), FieldResult::flagged(MISSING_VALUE)));
            needs_fix = true;
        }
    }

    FormattedEntry {
        kind,
        key,
        fields,
        needs_fix,
    }
}

/// Canonical-key policy: derive from clean formatted inputs, else keep the
/// source key and flag it
fn canonical_key(raw: &RawEntry, fields: &[(String, FieldResult)]) -> FieldResult {
    let clean = |name: &str| {
        fields
            .iter()
            .find(|(n, _)| n == name)
            .filter(|(_, r)| !r.needs_fix)
            .map(|(_, r)| r.value.as_str())
    };

    let derived = match (clean("title"), clean("author"), clean("year")) {
        (Some(title), Some(author), Some(year)) => derive_key(title, author, year),
        _ => None,
    };

    match derived {
        Some(key) => FieldResult::ok(key),
        None => FieldResult::flagged(raw.key.clone()),
    }
}

/// Process a batch of entries in input order.
///
/// The first entry to claim a canonical key wins; later entries with the
/// same key are dropped without reaching either sink.
pub fn process_batch(entries: &[RawEntry]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for raw in entries {
        let formatted = process_entry(raw);
        report_entry(raw, &formatted);

        if !seen.insert(formatted.key.value.clone()) {
            info!(key = %formatted.key.value, "dropping duplicate entry");
            outcome.duplicates_dropped += 1;
            continue;
        }

        if formatted.needs_fix {
            outcome.invalid.push(formatted);
        } else {
            outcome.valid.push(formatted);
        }
    }

    outcome
}

/// Emit one diagnostic event per formatted field.
///
/// The formatters themselves are pure; everything observable about a run
/// surfaces here, keyed for grepping: flagged fields at warn, silent
/// corrections at info, untouched fields at debug.
fn report_entry(raw: &RawEntry, formatted: &FormattedEntry) {
    let key = formatted.key.value.as_str();

    for (name, result) in &formatted.fields {
        if result.needs_fix {
            warn!(key, field = %name, value = %result.value, "needs manual fix");
        } else if raw.get(name).is_some_and(|orig| orig.trim() != result.value) {
            info!(key, field = %name, value = %result.value, "reformatted");
        } else {
            debug!(key, field = %name, "accepted");
        }
    }

    if formatted.key.needs_fix {
        warn!(key, "could not derive a canonical key; kept the source key");
    }
}

/// Run the whole tidy pass over one `.bib` file.
///
/// Reads and parses `input`, processes every entry, and writes the valid and
/// invalid sets to their respective paths. Parse issues are reported and
/// skipped; only I/O failures are fatal.
pub fn tidy_file(input: &Path, valid_path: &Path, invalid_path: &Path) -> Result<RunSummary, Error> {
    let text = fs::read_to_string(input).map_err(|source| Error::ReadInput {
        path: input.to_path_buf(),
        source,
    })?;

    let parsed = parse_file(&text);
    for issue in &parsed.issues {
        warn!(line = issue.line, "skipping unparseable region: {}", issue.message);
    }

    let outcome = process_batch(&parsed.entries);

    write_records(valid_path, &outcome.valid)?;
    write_records(invalid_path, &outcome.invalid)?;

    Ok(outcome.summary())
}

fn write_records(path: &Path, entries: &[FormattedEntry]) -> Result<(), Error> {
    let records: Vec<Record> = entries.iter().map(FormattedEntry::to_record).collect();
    let mut text = format_records(&records);
    if !text.is_empty() {
        text.push('\n');
    }

    fs::write(path, text).map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
