//! Low-level text cleaning primitives

use unicode_normalization::UnicodeNormalization;

/// Strip BibTeX decoration from a raw field fragment.
///
/// Takes the text after the last `=` (tolerating whole `field = {value}`
/// assignment fragments), removes brace and quote characters, and trims
/// surrounding whitespace and trailing commas.
pub fn strip_field_decoration(raw: &str) -> String {
    let value = raw.rsplit('=').next().unwrap_or(raw);
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(*c, '{' | '}' | '"'))
        .collect();
    cleaned.trim().trim_end_matches(',').trim().to_string()
}

/// Reduce text to ASCII letters only.
///
/// NFKD-folds first so accented letters contribute their base letter instead
/// of disappearing ("Müller" → "Muller"). Digits, punctuation, and spaces are
/// all dropped. Used for cite key components.
pub fn letters_only(text: &str) -> String {
    text.nfkd().filter(|c| c.is_ascii_alphabetic()).collect()
}

/// Collapse runs of whitespace into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_was_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
                prev_was_space = true;
            }
        } else {
            out.push(c);
            prev_was_space = false;
        }
    }

    out
}
