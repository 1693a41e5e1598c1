//! Supported entry kinds and their required fields

use serde::Serialize;

/// The closed set of entry kinds the bibliography supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Misc,
    InProceedings,
    Journal,
    TechReport,
}

impl EntryKind {
    /// Normalize a raw type token (case-insensitive).
    ///
    /// Anything outside the supported set becomes `InProceedings`; defaulting
    /// counts as resolved, not as a manual-fix condition.
    pub fn from_field(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "misc" => Self::Misc,
            "inproceedings" => Self::InProceedings,
            "journal" => Self::Journal,
            "techreport" => Self::TechReport,
            _ => Self::InProceedings,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Misc => "misc",
            Self::InProceedings => "inproceedings",
            Self::Journal => "journal",
            Self::TechReport => "techreport",
        }
    }

    /// Fields an entry of this kind must carry to be complete
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Misc => &["author", "howpublished", "title", "year"],
            Self::InProceedings => &["author", "booktitle", "title", "year"],
            Self::Journal => &["author", "journal", "title", "year"],
            Self::TechReport => &["author", "howpublished", "title", "year"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds_parse_case_insensitively() {
        assert_eq!(EntryKind::from_field("misc"), EntryKind::Misc);
        assert_eq!(EntryKind::from_field("TechReport"), EntryKind::TechReport);
        assert_eq!(EntryKind::from_field("JOURNAL"), EntryKind::Journal);
    }

    #[test]
    fn test_unknown_kind_defaults_to_inproceedings() {
        assert_eq!(EntryKind::from_field("phdthesis"), EntryKind::InProceedings);
        assert_eq!(EntryKind::from_field(""), EntryKind::InProceedings);
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            EntryKind::InProceedings.required_fields(),
            &["author", "booktitle", "title", "year"]
        );
        assert_eq!(
            EntryKind::TechReport.required_fields(),
            &["author", "howpublished", "title", "year"]
        );
    }
}
