//! Literal text corrections

use crate::document::Book;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One literal replacement; an empty `to` deletes the match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRule {
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl CorrectionRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Apply to `text` in place, returning the number of occurrences replaced
    fn apply(&self, text: &mut String) -> usize {
        if self.from.is_empty() {
            return 0;
        }
        let hits = text.matches(self.from.as_str()).count();
        if hits > 0 {
            *text = text.replace(self.from.as_str(), &self.to);
        }
        hits
    }
}

/// Counters from a correction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionStats {
    /// Content items visited
    pub items: usize,
    /// Occurrences replaced across titles and items
    pub replacements: usize,
}

fn apply_all(rules: &[CorrectionRule], text: &mut String) -> usize {
    rules.iter().map(|rule| rule.apply(text)).sum()
}

/// Apply rules in order to part titles, chapter titles and item text
///
/// Word counts of touched items are recomputed.
pub fn apply_corrections(book: &mut Book, rules: &[CorrectionRule]) -> CorrectionStats {
    let mut stats = CorrectionStats::default();
    for part in &mut book.parts {
        stats.replacements += apply_all(rules, &mut part.part_title);
        for chapter in &mut part.chapters {
            stats.replacements += apply_all(rules, &mut chapter.chapter_title);
            for item in &mut chapter.content {
                stats.items += 1;
                let hits = apply_all(rules, &mut item.content);
                if hits > 0 {
                    item.refresh_word_count();
                    stats.replacements += hits;
                }
            }
        }
    }
    debug!(items = stats.items, replacements = stats.replacements, "applied corrections");
    stats
}
