//! Pairing unique chapters with TOC entries

use super::types::{
    AlignOptions, Candidate, EntryMatch, MatchMethod, MatchStrategy, KEYWORD_SCORE, PREFIX_SCORE,
};
use crate::text::{normalize_label, take_chars};
use crate::toc::TableOfContents;
use strsim::normalized_levenshtein;
use tracing::{debug, warn};

/// Score a chapter opening against a normalized TOC title
///
/// Each of the leading title words long enough to count adds
/// [`KEYWORD_SCORE`] when the preview contains it. The title prefix adds
/// [`PREFIX_SCORE`] when the preview contains it, or failing that when the
/// preview opening is similar enough to the title.
pub fn keyword_score(title: &str, preview: &str, options: &AlignOptions) -> u32 {
    if title.is_empty() || preview.is_empty() {
        return 0;
    }

    let mut score = title
        .split_whitespace()
        .take(options.keyword_words)
        .filter(|word| word.chars().count() >= options.min_keyword_chars && preview.contains(word))
        .count() as u32
        * KEYWORD_SCORE;

    let prefix = take_chars(title, options.title_prefix_chars);
    if preview.contains(prefix) {
        score += PREFIX_SCORE;
    } else if options.fuzzy_threshold <= 1.0 {
        let window = take_chars(preview, title.chars().count());
        if normalized_levenshtein(title, window) >= options.fuzzy_threshold {
            score += PREFIX_SCORE;
        }
    }
    score
}

/// Match every TOC entry to at most one candidate
pub fn match_entries(
    toc: &TableOfContents,
    candidates: &[Candidate],
    options: &AlignOptions,
) -> Vec<EntryMatch> {
    match options.matching {
        MatchStrategy::Positional => match_positional(toc, candidates),
        MatchStrategy::ByNumber => match_by_number(toc, candidates),
        MatchStrategy::Keyword => match_by_keyword(toc, candidates, options),
    }
}

fn unfilled(entry: usize) -> EntryMatch {
    EntryMatch {
        entry,
        candidate: None,
        method: MatchMethod::Unfilled,
    }
}

fn match_positional(toc: &TableOfContents, candidates: &[Candidate]) -> Vec<EntryMatch> {
    if candidates.len() != toc.len() {
        warn!(
            chapters = candidates.len(),
            entries = toc.len(),
            "chapter count differs from TOC, pairing by position anyway"
        );
    }
    (0..toc.len())
        .map(|entry| {
            if entry < candidates.len() {
                EntryMatch {
                    entry,
                    candidate: Some(entry),
                    method: MatchMethod::Position,
                }
            } else {
                unfilled(entry)
            }
        })
        .collect()
}

fn match_by_number(toc: &TableOfContents, candidates: &[Candidate]) -> Vec<EntryMatch> {
    let entries = toc.entries();
    let keys = toc.part_keys();
    let mut matches: Vec<EntryMatch> = (0..entries.len()).map(unfilled).collect();
    // parts are consumed in order: a chapter never lands in an earlier part
    let mut cursor = 0;

    for (ci, candidate) in candidates.iter().enumerate() {
        let Some(number) = candidate.number else {
            debug!(title = %candidate.title, "no chapter number, left unmatched");
            continue;
        };

        let slot = keys.iter().enumerate().skip(cursor).find_map(|(ki, key)| {
            entries
                .iter()
                .enumerate()
                .find(|(ei, e)| {
                    e.part == *key && e.number() == Some(number) && matches[*ei].candidate.is_none()
                })
                .map(|(ei, _)| (ki, ei))
        });

        match slot {
            Some((ki, ei)) => {
                cursor = ki;
                matches[ei] = EntryMatch {
                    entry: ei,
                    candidate: Some(ci),
                    method: MatchMethod::Number,
                };
            }
            None => debug!(title = %candidate.title, number, "no open TOC slot for chapter"),
        }
    }
    matches
}

fn match_by_keyword(
    toc: &TableOfContents,
    candidates: &[Candidate],
    options: &AlignOptions,
) -> Vec<EntryMatch> {
    let mut pool: Vec<usize> = (0..candidates.len()).collect();
    let mut matches = Vec::with_capacity(toc.len());

    for (entry, toc_entry) in toc.entries().iter().enumerate() {
        let title = normalize_label(&toc_entry.title);

        let mut best: Option<(usize, u32)> = None;
        for (pos, &ci) in pool.iter().enumerate() {
            let score = keyword_score(&title, &candidates[ci].preview, options);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((pos, score));
            }
        }

        let outcome = match best {
            Some((pos, score)) => EntryMatch {
                entry,
                candidate: Some(pool.remove(pos)),
                method: MatchMethod::Keyword(score),
            },
            None if !pool.is_empty() => {
                warn!(title = %toc_entry.title, "no keyword match, taking next chapter");
                EntryMatch {
                    entry,
                    candidate: Some(pool.remove(0)),
                    method: MatchMethod::Fallback,
                }
            }
            None => {
                warn!(title = %toc_entry.title, "no chapters left for TOC entry");
                unfilled(entry)
            }
        };
        matches.push(outcome);
    }
    matches
}
