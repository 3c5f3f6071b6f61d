//! Chapter alignment module
//!
//! Rebuilds a book so its chapters follow the reference table of contents.
//! Extraction often yields chapters out of order, duplicated or split
//! across the wrong parts; this pass recovers a clean sequence.
//!
//! # Features
//!
//! - Front-matter splitting driven by ordered section rules
//! - Three dedup strategies (title preview, chapter number, content hash)
//! - Three match strategies (positional, by number, keyword scoring)
//! - Fuzzy title-prefix bonus using normalized Levenshtein similarity
//! - Repeated chapter label cleanup
//!
//! # Example
//!
//! ```rust,no_run
//! use bookmend::{AlignOptions, Book, ChapterAligner, NoProgress, TableOfContents};
//! use std::path::Path;
//!
//! let book = Book::load(Path::new("book.json")).unwrap();
//! let toc = TableOfContents::load(Path::new("toc.csv")).unwrap();
//!
//! let result = ChapterAligner::align(&book, &toc, &AlignOptions::content_match(), &NoProgress)
//!     .unwrap();
//! println!("{} TOC entries unfilled", result.report.unfilled());
//! result.book.save_with_backup(Path::new("book.json"), "_backup_align").unwrap();
//! ```

mod dedup;
mod matcher;
mod sections;
mod titles;
mod types;

pub use dedup::{collect_candidates, content_fingerprint, dedup, CollectStats};
pub use matcher::{keyword_score, match_entries};
pub use sections::split_front_matter;
pub use titles::{chapter_label, clean_repeated_title, TitleCleanup};
pub use types::{
    AlignError, AlignOptions, AlignOptionsBuilder, AlignReport, AlignResult, Candidate,
    DedupStrategy, EntryMatch, FrontSection, MatchMethod, MatchStrategy, Result, SectionRule,
    DEFAULT_DROP_SECTION, DEFAULT_FUZZY_THRESHOLD, DEFAULT_HASH_CHARS, DEFAULT_HASH_PARAGRAPHS,
    DEFAULT_KEYWORD_WORDS, DEFAULT_MIN_KEYWORD_CHARS, DEFAULT_PREVIEW_CHARS, DEFAULT_SKIP_TITLE,
    DEFAULT_TITLE_PREFIX_CHARS, KEYWORD_SCORE, PREFIX_SCORE,
};

use crate::document::{Book, Chapter, Part};
use crate::progress::{ProcessingStage, ProgressCallback};
use crate::toc::TableOfContents;
use std::collections::HashSet;
use tracing::{info, warn};

/// Book to TOC aligner
pub struct ChapterAligner;

impl ChapterAligner {
    /// Align `book` against `toc`, returning a new book and a report
    pub fn align(
        book: &Book,
        toc: &TableOfContents,
        options: &AlignOptions,
        progress: &dyn ProgressCallback,
    ) -> Result<AlignResult> {
        if toc.is_empty() {
            return Err(AlignError::EmptyToc);
        }
        let mut report = AlignReport::default();

        progress.on_stage(ProcessingStage::FrontMatter, options.sections.len());
        let sections = Self::front_matter(book, options);
        report.front_matter = sections
            .iter()
            .map(|s| (s.title.clone(), s.items.len()))
            .collect();
        // the source chapter is consumed once any section found text in it
        let exclude = sections
            .iter()
            .any(|s| !s.items.is_empty())
            .then_some((0, 0));

        progress.on_stage(ProcessingStage::Deduplicating, book.chapter_count());
        let (candidates, stats) = collect_candidates(book, options, exclude);
        if candidates.is_empty() {
            return Err(AlignError::NoChapters);
        }
        report.candidates = candidates.len();
        report.skipped_titles = stats.skipped_titles;
        report.empty_chapters = stats.empty_chapters;

        let unique = dedup(candidates, options.dedup);
        report.unique = unique.len();
        progress.on_stage_complete(
            ProcessingStage::Deduplicating,
            &format!("{} of {} chapters unique", report.unique, report.candidates),
        );

        progress.on_stage(ProcessingStage::Matching, toc.len());
        let matches = match_entries(toc, &unique, options);

        let entries = toc.entries();
        report.matches = matches
            .iter()
            .map(|m| {
                (
                    entries[m.entry].heading(),
                    m.candidate.map(|c| unique[c].title.clone()),
                    m.method,
                )
            })
            .collect();
        let used: HashSet<usize> = matches.iter().filter_map(|m| m.candidate).collect();
        report.unmatched = unique
            .iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, c)| c.title.clone())
            .collect();

        progress.on_stage(ProcessingStage::Assembling, 0);
        let mut aligned = Self::assemble(book, toc, &unique, &matches, sections, options);

        progress.on_stage(ProcessingStage::Cleaning, 0);
        aligned.parts.retain(|part| {
            let drop = options.drop_sections.contains(&part.part_title);
            if drop {
                report.dropped_sections.push(part.part_title.clone());
            }
            !drop
        });

        if options.clean_repeated_titles {
            for chapter in aligned.parts.iter_mut().flat_map(|p| p.chapters.iter_mut()) {
                match clean_repeated_title(chapter) {
                    TitleCleanup::Removed => report.titles_removed += 1,
                    TitleCleanup::Trimmed => report.titles_trimmed += 1,
                    TitleCleanup::Unchanged => {}
                }
            }
        }
        aligned.recompute_word_counts();

        report.parts = aligned.parts.len();
        report.chapters = aligned.chapter_count();
        info!(
            parts = report.parts,
            chapters = report.chapters,
            unfilled = report.unfilled(),
            unmatched = report.unmatched.len(),
            "alignment finished"
        );

        Ok(AlignResult {
            book: aligned,
            report,
        })
    }

    /// Front-matter sections from the first chapter of the first part
    fn front_matter(book: &Book, options: &AlignOptions) -> Vec<FrontSection> {
        if options.sections.is_empty() {
            return Vec::new();
        }
        match book.parts.first().and_then(|p| p.chapters.first()) {
            Some(first) => split_front_matter(&first.content, &options.sections),
            None => Vec::new(),
        }
    }

    fn assemble(
        book: &Book,
        toc: &TableOfContents,
        unique: &[Candidate],
        matches: &[EntryMatch],
        sections: Vec<FrontSection>,
        options: &AlignOptions,
    ) -> Book {
        let mut parts: Vec<Part> = sections
            .into_iter()
            .filter(|s| !s.items.is_empty())
            .map(|s| {
                let chapter = Chapter::new(s.title.clone(), s.items);
                Part::new(s.title, vec![chapter])
            })
            .collect();

        let entries = toc.entries();
        for key in toc.part_keys() {
            let chapters: Vec<Chapter> = matches
                .iter()
                .filter(|m| entries[m.entry].part == key)
                .filter_map(|m| {
                    let candidate = &unique[m.candidate?];
                    let mut chapter = book.parts[candidate.part].chapters[candidate.chapter].clone();
                    chapter.chapter_title = entries[m.entry].heading();
                    Some(chapter)
                })
                .collect();

            if chapters.is_empty() {
                warn!(part = key, "no chapters matched, part omitted");
                continue;
            }
            parts.push(Part::new(options.part_title(key), chapters));
        }

        Book::new(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentItem;
    use crate::progress::NoProgress;
    use crate::toc::TocEntry;

    fn chapter(title: &str, texts: &[&str]) -> Chapter {
        Chapter::new(title, texts.iter().map(|t| ContentItem::paragraph(*t)).collect())
    }

    fn toc() -> TableOfContents {
        TableOfContents::new(vec![
            TocEntry::new("I", "I", "What Devotion Is"),
            TocEntry::new("I", "II", "The Nature and Excellence of Devotion"),
            TocEntry::new("II", "I", "The Necessity of Prayer"),
        ])
    }

    fn extracted() -> Book {
        Book::new(vec![
            Part::new(
                "Part 1",
                vec![chapter(
                    "Content",
                    &[
                        "INTRODUCTION TO THE DEVOUT LIFE",
                        "This is a digital copy of a book.",
                        "Dear reader, this preface explains the book.",
                    ],
                )],
            ),
            Part::new(
                "Part 2",
                vec![
                    chapter(
                        "CHAPTER II. The Nature and Excellence of Devotion",
                        &["The nature and excellence of devotion. Saint Catherine saw it."],
                    ),
                    chapter("CHAPTER I. What Devotion Is", &["WHAT DEVOTION IS", "You aspire to devotion."]),
                    chapter("CHAPTER II. The Nature and Excellence of Devotion", &[
                        "The nature and excellence of devotion. Saint Catherine saw it.",
                    ]),
                    chapter("Empty", &[]),
                ],
            ),
            Part::new(
                "Part 3",
                vec![chapter(
                    "CHAPTER I. The Necessity of Prayer",
                    &["The necessity of prayer: it opens our understanding."],
                )],
            ),
        ])
    }

    fn options() -> AlignOptions {
        AlignOptions::builder()
            .section(SectionRule::new("TITLE PAGE").keep_only("This is a digital copy"))
            .section(SectionRule::new("PREFACE").begin("Dear reader"))
            .part_title("I", "PART I - Instructions")
            .build()
    }

    #[test]
    fn test_align_content_match() {
        let result = ChapterAligner::align(&extracted(), &toc(), &options(), &NoProgress).unwrap();
        let book = &result.book;

        let part_titles: Vec<_> = book.parts.iter().map(|p| p.part_title.as_str()).collect();
        assert_eq!(part_titles, vec!["PREFACE", "PART I - Instructions", "PART II"]);

        assert_eq!(book.parts[0].chapters[0].chapter_title, "PREFACE");
        let headings: Vec<_> = book.parts[1]
            .chapters
            .iter()
            .map(|c| c.chapter_title.as_str())
            .collect();
        assert_eq!(
            headings,
            vec!["CHAPTER I. What Devotion Is", "CHAPTER II. The Nature and Excellence of Devotion"]
        );

        // repeated labels cleaned
        assert_eq!(book.parts[1].chapters[0].content[0].content, "You aspire to devotion.");
        assert_eq!(book.parts[1].chapters[1].content[0].content, "Saint Catherine saw it.");
        assert_eq!(book.parts[2].chapters[0].content[0].content, "it opens our understanding.");

        let report = &result.report;
        assert_eq!(report.front_matter, vec![("TITLE PAGE".to_string(), 1), ("PREFACE".to_string(), 1)]);
        assert_eq!(report.dropped_sections, vec!["TITLE PAGE"]);
        assert_eq!(report.candidates, 4);
        assert_eq!(report.empty_chapters, 1);
        assert_eq!(report.unique, 3);
        assert_eq!(report.unfilled(), 0);
        assert_eq!(report.fallbacks(), 0);
        assert!(report.unmatched.is_empty());
        assert_eq!(report.titles_removed, 1);
        assert_eq!(report.titles_trimmed, 2);
        assert_eq!(report.parts, 3);
        assert_eq!(report.chapters, 4);
    }

    #[test]
    fn test_align_positional_keeps_extraction_order() {
        let opts = AlignOptions {
            matching: MatchStrategy::Positional,
            clean_repeated_titles: false,
            ..options()
        };
        let result = ChapterAligner::align(&extracted(), &toc(), &opts, &NoProgress).unwrap();
        // first unique chapter is the misplaced chapter II
        assert_eq!(
            result.book.parts[1].chapters[0].content[0].content,
            "The nature and excellence of devotion. Saint Catherine saw it."
        );
        assert_eq!(result.report.matches[0].2, MatchMethod::Position);
    }

    #[test]
    fn test_align_by_number() {
        let opts = AlignOptions {
            sections: Vec::new(),
            ..AlignOptions::title_key()
        };
        let result = ChapterAligner::align(&extracted(), &toc(), &opts, &NoProgress).unwrap();
        assert_eq!(result.book.parts.len(), 2);
        assert_eq!(
            result.book.parts[0].chapters[0].content[0].content,
            "You aspire to devotion."
        );
        assert!(result.report.matches.iter().all(|(_, _, m)| *m == MatchMethod::Number));
    }

    #[test]
    fn test_align_empty_toc() {
        let result = ChapterAligner::align(
            &extracted(),
            &TableOfContents::default(),
            &options(),
            &NoProgress,
        );
        assert!(matches!(result, Err(AlignError::EmptyToc)));
    }

    #[test]
    fn test_align_without_chapters() {
        let book = Book::new(vec![Part::new("P", vec![chapter("Content", &["x"])])]);
        let result = ChapterAligner::align(&book, &toc(), &AlignOptions::default(), &NoProgress);
        assert!(matches!(result, Err(AlignError::NoChapters)));
    }

    #[test]
    fn test_unfilled_part_is_omitted() {
        let toc = TableOfContents::new(vec![
            TocEntry::new("I", "I", "What Devotion Is"),
            TocEntry::new("II", "I", "Nothing Like This"),
        ]);
        let book = Book::new(vec![Part::new(
            "P",
            vec![chapter("CHAPTER I. What Devotion Is", &["What devotion is, truly."])],
        )]);
        let result = ChapterAligner::align(&book, &toc, &AlignOptions::default(), &NoProgress).unwrap();
        assert_eq!(result.book.parts.len(), 1);
        assert_eq!(result.report.unfilled(), 1);
    }
}
