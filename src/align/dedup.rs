//! Candidate collection and duplicate removal

use super::types::{AlignOptions, Candidate, DedupStrategy};
use crate::document::{Book, Chapter};
use crate::text::{normalize_label, take_chars};
use crate::toc::chapter_number_from_title;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Counters from candidate collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub skipped_titles: usize,
    pub empty_chapters: usize,
}

/// SHA-256 over the leading items of a chapter
pub fn content_fingerprint(chapter: &Chapter, paragraphs: usize, chars: usize) -> String {
    let mut hasher = Sha256::new();
    for item in chapter.content.iter().take(paragraphs) {
        hasher.update(take_chars(&item.content, chars).as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

fn dedup_key(chapter: &Chapter, number: Option<u32>, options: &AlignOptions) -> String {
    match options.dedup {
        DedupStrategy::TitlePreview => format!(
            "{}|{}",
            chapter.chapter_title,
            take_chars(chapter.first_text().unwrap_or(""), options.preview_chars)
        ),
        DedupStrategy::ChapterNumber => number.map(|n| n.to_string()).unwrap_or_default(),
        DedupStrategy::ContentHash => {
            content_fingerprint(chapter, options.hash_paragraphs, options.hash_chars)
        }
    }
}

/// Every alignable chapter in reading order
///
/// Chapters titled in `skip_titles` and chapters without items are left
/// out; `exclude` names one more (part, chapter) position to leave out.
pub fn collect_candidates(
    book: &Book,
    options: &AlignOptions,
    exclude: Option<(usize, usize)>,
) -> (Vec<Candidate>, CollectStats) {
    let mut stats = CollectStats::default();
    let mut candidates = Vec::new();

    for (pi, ci, chapter) in book.chapters() {
        if exclude == Some((pi, ci)) {
            continue;
        }
        if options.skip_titles.iter().any(|t| *t == chapter.chapter_title) {
            stats.skipped_titles += 1;
            continue;
        }
        if chapter.is_empty() {
            warn!(part = pi, chapter = ci, title = %chapter.chapter_title, "skipping empty chapter");
            stats.empty_chapters += 1;
            continue;
        }

        let number = chapter_number_from_title(&chapter.chapter_title);
        candidates.push(Candidate {
            part: pi,
            chapter: ci,
            title: chapter.chapter_title.clone(),
            number,
            preview: normalize_label(take_chars(
                chapter.first_text().unwrap_or(""),
                options.preview_chars,
            )),
            key: dedup_key(chapter, number, options),
        });
    }

    (candidates, stats)
}

/// Drop repeated candidates, keeping the first of each key
///
/// Under [`DedupStrategy::ChapterNumber`] unnumbered chapters are dropped
/// and the survivors are sorted by number.
pub fn dedup(candidates: Vec<Candidate>, strategy: DedupStrategy) -> Vec<Candidate> {
    let before = candidates.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| strategy != DedupStrategy::ChapterNumber || c.number.is_some())
        .filter(|c| seen.insert(c.key.clone()))
        .collect();

    if strategy == DedupStrategy::ChapterNumber {
        unique.sort_by_key(|c| c.number);
    }
    debug!(before, after = unique.len(), ?strategy, "deduplicated chapters");
    unique
}
