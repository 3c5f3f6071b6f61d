//! Search for sentences present only in a derived text

use super::types::{AddedContent, AddedSegment, SegmentCategory, MIN_SEGMENT_CHARS};
use crate::text::collapse_whitespace;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static BRACE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("brace pattern is valid"));
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\w\s.,;:!?()"-]"#).expect("character class pattern is valid"));
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"));

/// Normalize text for containment checks
///
/// Brace blocks (stray CSS) are dropped, characters outside words and basic
/// punctuation become spaces, whitespace is collapsed, letters lowercased.
pub fn normalize_for_diff(text: &str) -> String {
    let unbraced = BRACE_BLOCK.replace_all(text, " ");
    let cleaned = DISALLOWED.replace_all(&unbraced, " ");
    collapse_whitespace(&cleaned).to_lowercase()
}

/// Sentences of `other` that do not occur in `original`
///
/// A sentence is reported when its normalized form is longer than
/// [`MIN_SEGMENT_CHARS`], holds at least one word absent from `original`
/// and is not a substring of the normalized `original`.
pub fn find_added_segments(original: &str, other: &str) -> AddedContent {
    let original_norm = normalize_for_diff(original);
    let original_words: HashSet<&str> = original_norm.split_whitespace().collect();
    let other_norm = normalize_for_diff(other);
    let unique_words = other_norm
        .split_whitespace()
        .filter(|w| !original_words.contains(w))
        .map(str::to_string)
        .collect::<std::collections::BTreeSet<String>>();

    let mut segments = Vec::new();
    for sentence in SENTENCE_END.split(other) {
        let norm = normalize_for_diff(sentence);
        if norm.chars().count() <= MIN_SEGMENT_CHARS {
            continue;
        }
        let sentence_words: HashSet<&str> = norm.split_whitespace().collect();
        let unique = sentence_words
            .iter()
            .filter(|w| unique_words.contains(**w))
            .count();
        if unique == 0 || original_norm.contains(&norm) {
            continue;
        }

        let text = sentence.trim().to_string();
        segments.push(AddedSegment {
            length: text.chars().count(),
            unique_words: unique,
            category: SegmentCategory::classify(&text),
            text,
        });
    }

    AddedContent {
        segments,
        unique_words,
    }
}
