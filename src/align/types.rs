//! Alignment core types

use crate::document::Book;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Characters of the first item used for previews and title-preview keys
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

/// Items hashed per chapter for content-hash dedup
pub const DEFAULT_HASH_PARAGRAPHS: usize = 2;

/// Characters per item fed to the content hash
pub const DEFAULT_HASH_CHARS: usize = 200;

/// Leading title words scored by keyword matching
pub const DEFAULT_KEYWORD_WORDS: usize = 4;

/// Title words must be at least this long to score
pub const DEFAULT_MIN_KEYWORD_CHARS: usize = 4;

/// Title prefix length checked for the substring bonus
pub const DEFAULT_TITLE_PREFIX_CHARS: usize = 20;

/// Minimum normalized Levenshtein similarity for the fuzzy bonus
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Score added per matching keyword
pub const KEYWORD_SCORE: u32 = 1;

/// Score added for a title-prefix hit (exact or fuzzy)
pub const PREFIX_SCORE: u32 = 2;

/// Chapter title produced for text preceding the first heading
pub const DEFAULT_SKIP_TITLE: &str = "Content";

/// Front-matter section removed from the output by default
pub const DEFAULT_DROP_SECTION: &str = "TITLE PAGE";

// ============================================================
// Error Types
// ============================================================

/// Alignment error types
#[derive(Debug, Error)]
pub enum AlignError {
    #[error("Table of contents is empty")]
    EmptyToc,

    #[error("No chapters with content to align")]
    NoChapters,
}

pub type Result<T> = std::result::Result<T, AlignError>;

// ============================================================
// Strategies
// ============================================================

/// How duplicated chapters are recognized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupStrategy {
    /// Title plus the first characters of the first item
    TitlePreview,
    /// First chapter per parsed number, sorted by number
    ChapterNumber,
    /// Hash of the leading items, document order kept
    #[default]
    ContentHash,
}

/// How unique chapters are paired with TOC entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// i-th chapter to i-th entry
    Positional,
    /// Parsed chapter number, parts consumed in order
    ByNumber,
    /// Title keywords scored against the chapter opening
    #[default]
    Keyword,
}

/// Routing rule for one front-matter section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRule {
    /// Title of the produced section
    pub title: String,
    /// Paragraph announcing the section; dropped from the output
    pub heading: Option<String>,
    /// Paragraph opening the section (first paragraph if unset)
    pub begin: Option<String>,
    /// Paragraph closing the section, kept
    pub end: Option<String>,
    /// Keep only paragraphs containing this text
    pub keep_only: Option<String>,
}

impl SectionRule {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn heading(mut self, text: impl Into<String>) -> Self {
        self.heading = Some(text.into());
        self
    }

    #[must_use]
    pub fn begin(mut self, text: impl Into<String>) -> Self {
        self.begin = Some(text.into());
        self
    }

    #[must_use]
    pub fn end(mut self, text: impl Into<String>) -> Self {
        self.end = Some(text.into());
        self
    }

    #[must_use]
    pub fn keep_only(mut self, text: impl Into<String>) -> Self {
        self.keep_only = Some(text.into());
        self
    }
}

// ============================================================
// Options
// ============================================================

/// Alignment options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignOptions {
    pub dedup: DedupStrategy,
    #[serde(rename = "match")]
    pub matching: MatchStrategy,
    /// Chapter titles never treated as candidates
    pub skip_titles: Vec<String>,
    pub preview_chars: usize,
    pub hash_paragraphs: usize,
    pub hash_chars: usize,
    pub keyword_words: usize,
    pub min_keyword_chars: usize,
    pub title_prefix_chars: usize,
    /// Similarity needed for the fuzzy prefix bonus; above 1.0 disables it
    pub fuzzy_threshold: f64,
    /// Front-matter rules applied to the first chapter of the first part
    pub sections: Vec<SectionRule>,
    /// Output part titles by TOC part key
    pub part_titles: HashMap<String, String>,
    /// Part titles removed from the output
    pub drop_sections: Vec<String>,
    /// Strip chapter labels repeated in the first paragraph
    pub clean_repeated_titles: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            dedup: DedupStrategy::ContentHash,
            matching: MatchStrategy::Keyword,
            skip_titles: vec![DEFAULT_SKIP_TITLE.to_string()],
            preview_chars: DEFAULT_PREVIEW_CHARS,
            hash_paragraphs: DEFAULT_HASH_PARAGRAPHS,
            hash_chars: DEFAULT_HASH_CHARS,
            keyword_words: DEFAULT_KEYWORD_WORDS,
            min_keyword_chars: DEFAULT_MIN_KEYWORD_CHARS,
            title_prefix_chars: DEFAULT_TITLE_PREFIX_CHARS,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            sections: Vec::new(),
            part_titles: HashMap::new(),
            drop_sections: vec![DEFAULT_DROP_SECTION.to_string()],
            clean_repeated_titles: true,
        }
    }
}

impl AlignOptions {
    pub fn builder() -> AlignOptionsBuilder {
        AlignOptionsBuilder::default()
    }

    /// Title-and-preview dedup, chapters placed by number
    pub fn title_key() -> Self {
        Self {
            dedup: DedupStrategy::TitlePreview,
            matching: MatchStrategy::ByNumber,
            ..Default::default()
        }
    }

    /// One chapter per number, zipped with the TOC in order
    pub fn sequential() -> Self {
        Self {
            dedup: DedupStrategy::ChapterNumber,
            matching: MatchStrategy::Positional,
            ..Default::default()
        }
    }

    /// Content-hash dedup, zipped with the TOC in order
    pub fn content_hash() -> Self {
        Self {
            dedup: DedupStrategy::ContentHash,
            matching: MatchStrategy::Positional,
            ..Default::default()
        }
    }

    /// Content-hash dedup with keyword scoring (the default)
    pub fn content_match() -> Self {
        Self::default()
    }

    /// Title for a TOC part key
    pub fn part_title(&self, key: &str) -> String {
        self.part_titles
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("PART {key}"))
    }
}

/// Builder for AlignOptions
#[derive(Debug, Default)]
pub struct AlignOptionsBuilder {
    options: AlignOptions,
}

impl AlignOptionsBuilder {
    #[must_use]
    pub fn dedup(mut self, strategy: DedupStrategy) -> Self {
        self.options.dedup = strategy;
        self
    }

    #[must_use]
    pub fn matching(mut self, strategy: MatchStrategy) -> Self {
        self.options.matching = strategy;
        self
    }

    /// Set the fuzzy threshold (clamped to 0.0-1.01, where above 1.0 disables it)
    #[must_use]
    pub fn fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.options.fuzzy_threshold = threshold.clamp(0.0, 1.01);
        self
    }

    /// Set the hashed prefix size (each at least 1)
    #[must_use]
    pub fn hash_prefix(mut self, paragraphs: usize, chars: usize) -> Self {
        self.options.hash_paragraphs = paragraphs.max(1);
        self.options.hash_chars = chars.max(1);
        self
    }

    #[must_use]
    pub fn section(mut self, rule: SectionRule) -> Self {
        self.options.sections.push(rule);
        self
    }

    #[must_use]
    pub fn part_title(mut self, key: impl Into<String>, title: impl Into<String>) -> Self {
        self.options.part_titles.insert(key.into(), title.into());
        self
    }

    #[must_use]
    pub fn drop_sections(mut self, titles: Vec<String>) -> Self {
        self.options.drop_sections = titles;
        self
    }

    #[must_use]
    pub fn clean_repeated_titles(mut self, enabled: bool) -> Self {
        self.options.clean_repeated_titles = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> AlignOptions {
        self.options
    }
}

// ============================================================
// Results
// ============================================================

/// A chapter eligible for alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Part index in the source book
    pub part: usize,
    /// Chapter index within the part
    pub chapter: usize,
    pub title: String,
    /// Number parsed from a `CHAPTER <roman>` title
    pub number: Option<u32>,
    /// Normalized opening of the first item
    pub preview: String,
    /// Dedup key under the configured strategy
    pub key: String,
}

/// How a TOC entry got its chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Position,
    Number,
    /// Keyword match with its score
    Keyword(u32),
    /// Nothing scored; next remaining chapter taken
    Fallback,
    /// No chapter left
    Unfilled,
}

/// Outcome for one TOC entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMatch {
    /// Index into the TOC entries
    pub entry: usize,
    /// Index into the unique candidates
    pub candidate: Option<usize>,
    pub method: MatchMethod,
}

/// Front-matter section extracted from the first chapter
#[derive(Debug, Clone, PartialEq)]
pub struct FrontSection {
    pub title: String,
    pub items: Vec<crate::document::ContentItem>,
}

/// What an alignment run did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignReport {
    /// Front-matter sections with their paragraph counts
    pub front_matter: Vec<(String, usize)>,
    /// Chapters considered after skipping titles and empty chapters
    pub candidates: usize,
    pub skipped_titles: usize,
    pub empty_chapters: usize,
    /// Candidates left after dedup
    pub unique: usize,
    /// Per TOC entry: heading, source chapter title, method
    pub matches: Vec<(String, Option<String>, MatchMethod)>,
    /// Unique chapters no TOC entry received
    pub unmatched: Vec<String>,
    pub dropped_sections: Vec<String>,
    pub titles_removed: usize,
    pub titles_trimmed: usize,
    pub parts: usize,
    pub chapters: usize,
}

impl AlignReport {
    pub fn unfilled(&self) -> usize {
        self.matches
            .iter()
            .filter(|(_, _, m)| *m == MatchMethod::Unfilled)
            .count()
    }

    pub fn fallbacks(&self) -> usize {
        self.matches
            .iter()
            .filter(|(_, _, m)| *m == MatchMethod::Fallback)
            .count()
    }
}

/// Realigned book plus report
#[derive(Debug, Clone)]
pub struct AlignResult {
    pub book: Book,
    pub report: AlignReport,
}
