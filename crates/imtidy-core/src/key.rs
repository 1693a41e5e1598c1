//! Canonical cite key derivation
//!
//! A key has the shape `<authorKey><year><titleKey>`, all lowercase, letters
//! and digits only: `dingledine2004tor`. It doubles as the output record key
//! and as the deduplication key, so it must be deterministic for identical
//! normalized inputs.

use crate::normalize::SMALL_WORDS;
use crate::text::letters_only;

/// Derive a canonical cite key from *formatted* title, author, and year.
///
/// Returns `None` when any input is empty or when every title word is a stop
/// word; the caller decides the fallback policy.
pub fn derive_key(title: &str, author: &str, year: &str) -> Option<String> {
    if title.is_empty() || author.is_empty() || year.is_empty() {
        return None;
    }

    let lowered = title.to_lowercase();
    let title_key = lowered
        .split_whitespace()
        .find(|word| !SMALL_WORDS.contains(*word))?;

    let first_author = author.split(" and ").next().unwrap_or(author);
    let author_words: Vec<&str> = first_author.split_whitespace().collect();
    let author_key = match author_words.as_slice() {
        // No internal space: an organization-style name, used whole
        [] | [_] => first_author,
        // A person: the last name wins
        [.., last] => *last,
    };

    let key = format!("{}{}{}", letters_only(author_key), year, letters_only(title_key));
    Some(key.to_lowercase())
}
