//! Raw bibliography entry model

use serde::{Deserialize, Serialize};

/// A single raw field as it appeared in the source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub name: String,
    pub value: String,
}

/// One entry parsed from a `.bib` database, before any normalization.
///
/// The entry type is kept as the raw source string; mapping it onto the
/// supported kind set is the normalization core's decision, not the parser's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Source cite key, e.g. `dingledine2004tor`
    pub key: String,
    /// Raw entry type token, e.g. `inproceedings`
    pub entry_type: String,
    /// Fields in source order
    pub fields: Vec<RawField>,
}

impl RawEntry {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, keeping source order
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(RawField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Look up a field value by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        let wanted = name.to_lowercase();
        self.fields
            .iter()
            .find(|f| f.name.to_lowercase() == wanted)
            .map(|f| f.value.as_str())
    }
}
