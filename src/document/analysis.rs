//! Structure analysis
//!
//! Reports the informal invariants of a book document: unique chapter
//! titles, non-empty content, fresh word counts, and chapter order
//! matching the reference table of contents.

use super::types::{count_words, Book};
use crate::text::collapse_whitespace;
use crate::toc::TableOfContents;
use std::collections::{HashMap, HashSet};

/// Per-part summary
#[derive(Debug, Clone, PartialEq)]
pub struct PartSummary {
    pub title: String,
    pub subtitle: Option<String>,
    pub chapters: usize,
    pub items: usize,
    pub words: usize,
}

/// Position of a chapter (and optionally an item) in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub part: usize,
    pub chapter: usize,
    pub item: Option<usize>,
}

/// Document chapter order compared against the reference TOC
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TocComparison {
    /// Number of TOC entries
    pub expected: usize,
    /// Number of numbered chapters found in the document
    pub found: usize,
    /// First index where the sequences differ
    pub first_divergence: Option<usize>,
    /// TOC heading at the divergence
    pub expected_at: Option<String>,
    /// Document title at the divergence
    pub found_at: Option<String>,
    /// TOC headings with no matching document chapter
    pub missing: Vec<String>,
    /// Numbered document chapters absent from the TOC
    pub unexpected: Vec<String>,
    /// Chapter count per TOC part key
    pub parts: Vec<(String, usize)>,
}

impl TocComparison {
    pub fn is_aligned(&self) -> bool {
        self.first_divergence.is_none() && self.missing.is_empty() && self.unexpected.is_empty()
    }
}

/// Structure report for a book document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureReport {
    pub parts: Vec<PartSummary>,
    pub total_chapters: usize,
    pub total_items: usize,
    pub total_words: usize,
    pub unique_titles: usize,
    /// Titles occurring more than once, with their counts, in first-seen order
    pub duplicate_titles: Vec<(String, usize)>,
    pub empty_chapters: Vec<Location>,
    pub blank_items: Vec<Location>,
    /// Items whose stored word count differs from a fresh count
    pub stale_word_counts: usize,
    pub toc: Option<TocComparison>,
}

fn heading_key(title: &str) -> String {
    collapse_whitespace(title).to_uppercase()
}

fn is_numbered_chapter(title: &str) -> bool {
    heading_key(title).starts_with("CHAPTER ")
}

impl StructureReport {
    /// Analyze a book, optionally against a reference TOC
    pub fn analyze(book: &Book, toc: Option<&TableOfContents>) -> Self {
        let mut report = Self {
            parts: book
                .parts
                .iter()
                .map(|p| PartSummary {
                    title: p.part_title.clone(),
                    subtitle: p.part_subtitle.clone(),
                    chapters: p.chapters.len(),
                    items: p.item_count(),
                    words: p
                        .chapters
                        .iter()
                        .flat_map(|c| &c.content)
                        .map(|i| count_words(&i.content))
                        .sum(),
                })
                .collect(),
            total_chapters: book.chapter_count(),
            total_items: book.item_count(),
            ..Default::default()
        };
        report.total_words = report.parts.iter().map(|p| p.words).sum();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for (pi, ci, chapter) in book.chapters() {
            let title = chapter.chapter_title.as_str();
            let count = counts.entry(title).or_insert(0);
            if *count == 0 {
                order.push(title);
            }
            *count += 1;

            if chapter.is_empty() {
                report.empty_chapters.push(Location {
                    part: pi,
                    chapter: ci,
                    item: None,
                });
            }
            for (ii, item) in chapter.content.iter().enumerate() {
                if item.is_blank() {
                    report.blank_items.push(Location {
                        part: pi,
                        chapter: ci,
                        item: Some(ii),
                    });
                }
                if item.word_count != count_words(&item.content) {
                    report.stale_word_counts += 1;
                }
            }
        }
        report.unique_titles = order.len();
        report.duplicate_titles = order
            .into_iter()
            .filter_map(|t| {
                let n = counts[t];
                (n > 1).then(|| (t.to_string(), n))
            })
            .collect();

        report.toc = toc.map(|toc| compare_with_toc(book, toc));
        report
    }

    /// Whether every checked invariant holds
    pub fn is_clean(&self) -> bool {
        self.duplicate_titles.is_empty()
            && self.empty_chapters.is_empty()
            && self.blank_items.is_empty()
            && self.stale_word_counts == 0
            && self.toc.as_ref().map_or(true, TocComparison::is_aligned)
    }
}

fn compare_with_toc(book: &Book, toc: &TableOfContents) -> TocComparison {
    let expected: Vec<String> = toc.headings();
    let found: Vec<&str> = book
        .chapters()
        .map(|(_, _, c)| c.chapter_title.as_str())
        .filter(|t| is_numbered_chapter(t))
        .collect();

    let expected_keys: Vec<String> = expected.iter().map(|t| heading_key(t)).collect();
    let found_keys: Vec<String> = found.iter().map(|t| heading_key(t)).collect();

    let first_divergence = (0..expected_keys.len().max(found_keys.len()))
        .find(|&i| expected_keys.get(i) != found_keys.get(i));

    let found_set: HashSet<&String> = found_keys.iter().collect();
    let expected_set: HashSet<&String> = expected_keys.iter().collect();

    TocComparison {
        expected: expected.len(),
        found: found.len(),
        first_divergence,
        expected_at: first_divergence.and_then(|i| expected.get(i).cloned()),
        found_at: first_divergence.and_then(|i| found.get(i).map(|s| s.to_string())),
        missing: expected
            .iter()
            .zip(&expected_keys)
            .filter(|(_, key)| !found_set.contains(key))
            .map(|(title, _)| title.clone())
            .collect(),
        unexpected: found
            .iter()
            .zip(&found_keys)
            .filter(|(_, key)| !expected_set.contains(key))
            .map(|(title, _)| title.to_string())
            .collect(),
        parts: toc
            .part_keys()
            .into_iter()
            .map(|key| (key.to_string(), toc.chapters_in(key).count()))
            .collect(),
    }
}
