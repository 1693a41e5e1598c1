//! End-to-end pipeline tests
//!
//! Drives the full tidy pass the way the CLI does: parse a .bib text,
//! process the batch, check what lands in which output file.

use proptest::prelude::*;
use tempfile::tempdir;

use imtidy_bibtex::parse_file;
use imtidy_core::{
    derive_key, format_year, process_batch, tidy_file, FieldResult, MISSING_VALUE,
};

// === Full scenario ===

#[test]
fn test_tor_entry_normalizes_to_valid() {
    let input = r#"
@inproceedings{torpaper,
    author = {Dingledine, Roger and Mathewson, Nick},
    title = {tor: the second generation onion router},
    year = {2004},
    booktitle = {13th USENIX Security Symposium},
}
"#;
    let parsed = parse_file(input);
    assert!(parsed.issues.is_empty());

    let outcome = process_batch(&parsed.entries);
    assert_eq!(outcome.valid.len(), 1);
    assert_eq!(outcome.invalid.len(), 0);

    let entry = &outcome.valid[0];
    assert_eq!(entry.key, FieldResult::ok("dingledine2004tor"));
    assert_eq!(
        entry.field("author"),
        Some(&FieldResult::ok("Roger Dingledine and Nick Mathewson"))
    );
    assert_eq!(
        entry.field("title"),
        Some(&FieldResult::ok("Tor: The Second Generation Onion Router"))
    );
    assert_eq!(entry.field("year"), Some(&FieldResult::ok("2004")));
    assert_eq!(
        entry.field("booktitle"),
        Some(&FieldResult::ok("USENIX Security Symposium"))
    );
    assert!(!entry.needs_fix);
}

#[test]
fn test_missing_booktitle_routes_invalid() {
    let input = r#"
@inproceedings{nobooktitle,
    author = {Dingledine, Roger},
    title = {Some Valid Title},
    year = {2004},
}
"#;
    let outcome = process_batch(&parse_file(input).entries);
    assert_eq!(outcome.valid.len(), 0);
    assert_eq!(outcome.invalid.len(), 1);

    let entry = &outcome.invalid[0];
    assert_eq!(
        entry.field("booktitle"),
        Some(&FieldResult::flagged(MISSING_VALUE))
    );
    // Everything else was fine, so the canonical key still derived
    assert_eq!(entry.key, FieldResult::ok("dingledine2004some"));
}

#[test]
fn test_unknown_type_defaults_and_unknown_venue_flags() {
    let input = r#"
@phdthesis{thesis2001key,
    author = {Kate Thomas},
    title = {A Thesis},
    year = {2001},
    booktitle = {Department of Obscure Studies},
}
"#;
    let outcome = process_batch(&parse_file(input).entries);
    assert_eq!(outcome.invalid.len(), 1);

    let entry = &outcome.invalid[0];
    // phdthesis is outside the supported set: defaulted, not flagged
    assert_eq!(entry.kind.as_str(), "inproceedings");
    let venue = entry.field("booktitle").expect("venue kept");
    assert!(venue.needs_fix);
    assert_eq!(venue.value, "Department of Obscure Studies");
}

// === Deduplication ===

#[test]
fn test_duplicate_keys_first_occurrence_wins() {
    let input = r#"
@inproceedings{first,
    author = {Dingledine, Roger},
    title = {Onion Routing},
    year = {2004},
    booktitle = {USENIX Security Symposium},
}

@inproceedings{second,
    author = {Roger Dingledine},
    title = {ONION ROUTING},
    year = {2004},
    booktitle = {USENIX Security Symposium},
}
"#;
    let outcome = process_batch(&parse_file(input).entries);
    assert_eq!(outcome.valid.len() + outcome.invalid.len(), 1);
    assert_eq!(outcome.duplicates_dropped, 1);
    assert_eq!(outcome.valid[0].key.value, "dingledine2004onion");
}

// === File-level run ===

#[test]
fn test_tidy_file_writes_both_outputs() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("refs.bib");
    let valid = dir.path().join("validBib.bib");
    let invalid = dir.path().join("invalidBib.bib");

    std::fs::write(
        &input,
        r#"
@inproceedings{good,
    author = {Dingledine, Roger and Mathewson, Nick},
    title = {tor: the second generation onion router},
    year = {2004},
    booktitle = {13th USENIX Security Symposium},
}

@misc{bad,
    author = {K. Thomas},
    title = {An Abbreviated Author},
    year = {1999},
    howpublished = {note},
}
"#,
    )
    .expect("write input");

    let summary = tidy_file(&input, &valid, &invalid).expect("tidy run");
    assert_eq!(summary.valid, 1);
    assert_eq!(summary.invalid, 1);
    assert_eq!(summary.duplicates, 0);

    let valid_text = std::fs::read_to_string(&valid).expect("valid output");
    assert!(valid_text.starts_with("@inproceedings{dingledine2004tor,"));
    assert!(valid_text.contains("  author={Roger Dingledine and Nick Mathewson},\n"));
    assert!(!valid_text.contains("},*"));

    let invalid_text = std::fs::read_to_string(&invalid).expect("invalid output");
    // Abbreviated author: flagged field, source key kept
    assert!(invalid_text.starts_with("@misc{bad,"));
    assert!(invalid_text.contains("  author={K. Thomas},*\n"));
    // howpublished is required for misc but has no formatter
    assert!(invalid_text.contains("  howpublished={<Missing>},*\n"));
}

#[test]
fn test_tidy_file_missing_input_is_the_only_fatal_error() {
    let dir = tempdir().expect("tempdir");
    let result = tidy_file(
        &dir.path().join("nope.bib"),
        &dir.path().join("v.bib"),
        &dir.path().join("i.bib"),
    );
    let err = result.expect_err("missing input must fail");
    assert!(err.to_string().contains("nope.bib"));
}

// === Serialization of results ===

#[test]
fn test_summary_serializes_to_json() {
    let input = r#"
@inproceedings{a,
    author = {Dingledine, Roger},
    title = {Onion Routing},
    year = {2004},
    booktitle = {USENIX Security Symposium},
}
"#;
    let outcome = process_batch(&parse_file(input).entries);
    let json = serde_json::to_value(outcome.summary()).expect("serialize");
    assert_eq!(json["valid"], 1);
    assert_eq!(json["invalid"], 0);
    assert_eq!(json["duplicates"], 0);
}

// === Properties ===

proptest! {
    /// A four-digit year embedded in arbitrary non-digit noise is always
    /// recovered exactly.
    #[test]
    fn prop_year_extracted_from_noise(
        year in 1000u32..=9999,
        prefix in "[^0-9]{0,8}",
        suffix in "[^0-9]{0,8}",
    ) {
        let raw = format!("{prefix}{year}{suffix}");
        let result = format_year(&raw);
        prop_assert!(!result.needs_fix);
        prop_assert_eq!(result.value, year.to_string());
    }

    /// Key derivation is deterministic and ignores letter case.
    #[test]
    fn prop_key_is_deterministic_and_case_insensitive(
        title in "[a-zA-Z]{3,12}( [a-zA-Z]{3,12}){0,3}",
        author in "[A-Z][a-z]{2,10} [A-Z][a-z]{2,10}",
        year in 1900u32..=2099,
    ) {
        let year = year.to_string();
        let first = derive_key(&title, &author, &year);
        let second = derive_key(&title, &author, &year);
        prop_assert_eq!(&first, &second);

        let shouted = derive_key(&title.to_uppercase(), &author.to_uppercase(), &year);
        prop_assert_eq!(first, shouted);
    }
}
