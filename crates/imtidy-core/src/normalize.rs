//! Per-field formatters
//!
//! Each formatter is a pure function from a raw field value to a
//! [`FieldResult`]: the normalized value plus a flag saying whether automated
//! normalization gave up and a human has to review the field. Formatters
//! never fail; a value they cannot improve is passed through flagged.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashSet;

use crate::text::collapse_whitespace;

lazy_static! {
    /// Short words kept lowercase in titles and skipped when picking the
    /// cite-key title word
    pub(crate) static ref SMALL_WORDS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        let words = [
            "a", "an", "as", "on", "to", "by", "with", "from", "in", "of",
            "the", "and", "for", "is",
        ];
        for word in words {
            set.insert(word);
        }
        set
    };
}

/// The outcome of normalizing one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResult {
    pub value: String,
    /// True when automated normalization could not produce a confident result
    pub needs_fix: bool,
}

impl FieldResult {
    /// A confidently normalized value
    pub fn ok(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            needs_fix: false,
        }
    }

    /// A value that needs human review
    pub fn flagged(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            needs_fix: true,
        }
    }
}

/// Normalize a single author name to "First Middle... Last".
///
/// A comma means "Last, First..." form and triggers reordering; otherwise the
/// name is taken as already being in "First ... Last" order. A name that
/// cannot be split at all (an organization like "IBM") passes through
/// unflagged. Abbreviated first names ("K." or single letters) are flagged:
/// the bibliography wants full first names.
pub fn format_author_name(raw: &str) -> FieldResult {
    let name = raw.trim();
    let comma_form = name.contains(',');

    let parts: Vec<&str> = if comma_form {
        name.split(',').map(str::trim).collect()
    } else {
        name.split(' ').collect()
    };

    if parts.len() <= 1 {
        return FieldResult::ok(name);
    }

    let first_name = if comma_form { parts[1] } else { parts[0] };

    let value = if comma_form {
        let mut ordered: Vec<&str> = parts[1..].to_vec();
        ordered.push(parts[0]);
        ordered.join(" ")
    } else {
        parts.join(" ")
    };

    let mut chars = first_name.chars();
    let abbreviated = match (chars.next(), chars.next()) {
        (_, Some(second)) => second == '.',
        _ => true, // empty or single-letter first name
    };

    FieldResult {
        value,
        needs_fix: abbreviated,
    }
}

/// Normalize a full author field ("A and B and C").
///
/// The flag is the OR over every individual author: one abbreviated name
/// anywhere in the list flags the whole field.
pub fn format_author_list(raw: &str) -> FieldResult {
    let mut needs_fix = false;
    let formatted: Vec<String> = raw
        .split(" and ")
        .map(|author| {
            let result = format_author_name(author);
            needs_fix |= result.needs_fix;
            result.value
        })
        .collect();

    let joined = collapse_whitespace(&formatted.join(" and "));
    FieldResult {
        value: joined.trim().to_string(),
        needs_fix,
    }
}

/// Title-case a title, honoring the small-word exception list.
///
/// Small words stay lowercase unless they open the title or follow a
/// colon-terminated word. Words with capitals past the first letter
/// (acronyms, braced LaTeX fragments) are left untouched. Titles are always
/// auto-corrected, never flagged.
pub fn format_title(raw: &str) -> FieldResult {
    let collapsed = collapse_whitespace(raw.trim());

    let mut words = Vec::new();
    let mut force_capital = true;
    for word in collapsed.split(' ') {
        let lowered = word.to_lowercase();
        let cased = if !force_capital && SMALL_WORDS.contains(lowered.as_str()) {
            lowered
        } else if word.chars().skip(1).any(|c| c.is_uppercase()) {
            word.to_string()
        } else {
            capitalize_first(word)
        };
        force_capital = word.ends_with(':');
        words.push(cased);
    }

    FieldResult::ok(words.join(" "))
}

/// Extract a four-digit year.
///
/// Takes the first maximal digit run anywhere in the field; valid only if it
/// is exactly four digits. Anything else keeps the original value, flagged.
pub fn format_year(raw: &str) -> FieldResult {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    if digits.len() == 4 {
        FieldResult::ok(digits)
    } else {
        FieldResult::flagged(raw)
    }
}

/// Uppercase the first alphabetic character, lowercasing the rest
fn capitalize_first(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut done = false;
    for c in word.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Authors ===

    #[test]
    fn test_comma_form_is_reordered() {
        let result = format_author_name("Thomas, Kate");
        assert_eq!(result.value, "Kate Thomas");
        assert!(!result.needs_fix);
    }

    #[test]
    fn test_space_form_keeps_order() {
        let result = format_author_name("Kate Thomas");
        assert_eq!(result.value, "Kate Thomas");
        assert!(!result.needs_fix);
    }

    #[test]
    fn test_abbreviated_first_name_is_flagged() {
        assert!(format_author_name("K. Thomas").needs_fix);
        assert!(format_author_name("Thomas, K.").needs_fix);
        assert!(format_author_name("K Thomas").needs_fix);
    }

    #[test]
    fn test_unsplittable_name_passes_through() {
        let result = format_author_name("IBM");
        assert_eq!(result.value, "IBM");
        assert!(!result.needs_fix);
    }

    #[test]
    fn test_middle_names_survive_reordering() {
        let result = format_author_name("King, Martin Luther");
        assert_eq!(result.value, "Martin Luther King");
        assert!(!result.needs_fix);
    }

    #[test]
    fn test_author_list_flag_is_or_across_all() {
        let result = format_author_list("Roger Dingledine and N. Mathewson and Paul Syverson");
        assert_eq!(
            result.value,
            "Roger Dingledine and N. Mathewson and Paul Syverson"
        );
        assert!(result.needs_fix);
    }

    #[test]
    fn test_author_list_all_clean() {
        let result = format_author_list("Dingledine, Roger and Mathewson, Nick");
        assert_eq!(result.value, "Roger Dingledine and Nick Mathewson");
        assert!(!result.needs_fix);
    }

    // === Titles ===

    #[test]
    fn test_title_casing_with_small_words() {
        let result = format_title("a study in scarlet");
        assert_eq!(result.value, "A Study in Scarlet");
        assert!(!result.needs_fix);
    }

    #[test]
    fn test_title_capitalizes_after_colon() {
        let result = format_title("tor: the second generation onion router");
        assert_eq!(result.value, "Tor: The Second Generation Onion Router");
    }

    #[test]
    fn test_title_preserves_acronyms() {
        let result = format_title("attacking USENIX and LaTeX tools");
        assert_eq!(result.value, "Attacking USENIX and LaTeX Tools");
    }

    #[test]
    fn test_title_collapses_whitespace() {
        let result = format_title("too   many    spaces");
        assert_eq!(result.value, "Too Many Spaces");
    }

    // === Years ===

    #[test]
    fn test_year_extracted_from_noise() {
        let result = format_year("c. 1999 (est.)");
        assert_eq!(result.value, "1999");
        assert!(!result.needs_fix);
    }

    #[test]
    fn test_year_without_four_digit_run_is_flagged() {
        let result = format_year("circa 99");
        assert_eq!(result.value, "circa 99");
        assert!(result.needs_fix);

        let result = format_year("20045");
        assert_eq!(result.value, "20045");
        assert!(result.needs_fix);
    }
}
