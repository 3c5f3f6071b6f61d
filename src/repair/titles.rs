//! Part title splitting

use crate::document::Book;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Rules for turning `PART ... - SUBTITLE` titles into title plus subtitle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleRules {
    /// Phrase replacements applied to the title head, in order
    pub ordinals: Vec<(String, String)>,
    /// Words kept capitalized in subtitles (matched case-insensitively)
    pub always_capitalized: Vec<String>,
}

impl Default for TitleRules {
    fn default() -> Self {
        let ordinals = [
            ("THE FIRST", "I"),
            ("THE SECOND", "II"),
            ("THE THIRD", "III"),
            ("THE FOURTH", "IV"),
            ("THE FIFTH", "V"),
        ];
        Self {
            ordinals: ordinals
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            always_capitalized: ["GOD", "JESUS", "CHRIST", "LORD", "HOLY", "SPIRIT", "DIVINE"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sentence-case a subtitle, keeping listed words capitalized
pub fn sentence_case(text: &str, always_capitalized: &[String]) -> String {
    let keep: HashSet<String> = always_capitalized.iter().map(|w| w.to_lowercase()).collect();
    text.to_lowercase()
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let bare: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if i == 0 || keep.contains(&bare) {
                capitalize(word)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a part title at its first `-` into (title, subtitle)
///
/// Returns `None` when the title has no `-` or the subtitle would be empty.
pub fn split_part_title(title: &str, rules: &TitleRules) -> Option<(String, String)> {
    let (head, tail) = title.split_once('-')?;
    let tail = tail.trim();
    if tail.is_empty() {
        return None;
    }

    let mut head = head.trim().to_string();
    for (from, to) in &rules.ordinals {
        head = head.replace(from.as_str(), to);
    }
    Some((head, sentence_case(tail, &rules.always_capitalized)))
}

/// Split every part title that carries a subtitle; returns parts changed
pub fn split_part_titles(book: &mut Book, rules: &TitleRules) -> usize {
    let mut changed = 0;
    for part in &mut book.parts {
        if let Some((title, subtitle)) = split_part_title(&part.part_title, rules) {
            debug!(from = %part.part_title, to = %title, subtitle = %subtitle, "split part title");
            part.part_title = title;
            part.part_subtitle = Some(subtitle);
            changed += 1;
        }
    }
    changed
}
