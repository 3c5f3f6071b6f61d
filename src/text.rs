//! Shared text helpers

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("non-word pattern is valid"));

/// Collapse every whitespace run into one space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Normalize a label for loose comparison
///
/// Dashes become spaces, letters are lowercased, punctuation becomes
/// spaces, and whitespace is collapsed.
pub fn normalize_label(text: &str) -> String {
    let dashed: String = text
        .chars()
        .map(|c| match c {
            '\u{2014}' | '\u{2013}' | '-' => ' ',
            other => other,
        })
        .collect();
    let lowered = dashed.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, " ");
    collapse_whitespace(&stripped)
}

/// First `max` characters of `text`, respecting char boundaries
pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
