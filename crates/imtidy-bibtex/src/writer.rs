//! Record serialization
//!
//! Writes processed entries back out as BibTeX records. A field that still
//! needs a manual fix gets a trailing `*` on its line so the curator can scan
//! the invalid output file for exactly what to touch up.

use serde::Serialize;

/// One field of a record to serialize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordField {
    pub name: String,
    pub value: String,
    /// Marks the serialized line with the manual-fix sentinel
    pub needs_fix: bool,
}

/// A fully processed entry ready for serialization.
///
/// `kind` and `key` are part of the record head (`@kind{key,`), never
/// serialized as ordinary fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub kind: String,
    pub key: String,
    pub fields: Vec<RecordField>,
}

/// Serialize a single record
pub fn format_record(record: &Record) -> String {
    let mut out = String::new();

    out.push('@');
    out.push_str(&record.kind);
    out.push('{');
    out.push_str(&record.key);
    out.push_str(",\n");

    for field in &record.fields {
        out.push_str("  ");
        out.push_str(&field.name);
        out.push_str("={");
        out.push_str(&field.value);
        out.push_str("},");
        if field.needs_fix {
            out.push('*');
        }
        out.push('\n');
    }

    out.push('}');
    out
}

/// Serialize records with one blank line between them
pub fn format_records(records: &[Record]) -> String {
    records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}
