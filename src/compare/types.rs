//! EPUB text diagnostics core types

use crate::epub::{EpubError, NavPoint};
use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Entry name suffixes never counted as book text
pub const EXCLUDED_SUFFIXES: [&str; 5] = [
    "toc.html",
    "container.xml",
    "_page_map_.xml",
    ".ncx",
    ".opf",
];

/// Entries under this directory are never counted as book text
pub const EXCLUDED_DIR: &str = "META-INF";

/// Normalized sentences this short or shorter are not reported as added
pub const MIN_SEGMENT_CHARS: usize = 20;

const LICENSE_KEYWORDS: &[&str] = &[
    "license",
    "licença",
    "copyright",
    "creative commons",
    "public domain",
    "domínio público",
];

const METADATA_KEYWORDS: &[&str] = &[
    "google books",
    "scanned",
    "digitalizada",
    "edition",
    "translation",
    "tradução",
];

const NAVIGATION_KEYWORDS: &[&str] = &["part", "chapter", "title page", "título", "página"];

const FORMATTING_KEYWORDS: &[&str] = &["font-family", "margin", "padding", "text-align", "css"];

// ============================================================
// Error Types
// ============================================================

/// Comparison error types
#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Epub(#[from] EpubError),

    #[error("No text documents found in {0}")]
    NoText(PathBuf),

    #[error("No NCX navigation document found")]
    NoNavigation,
}

pub type Result<T> = std::result::Result<T, CompareError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Character counts of one archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    pub name: String,
    pub chars: usize,
}

/// All book text of an EPUB
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainText {
    /// Text of every document, joined by single spaces
    pub text: String,
    /// Documents that contributed text, in name order
    pub documents: Vec<DocumentText>,
}

/// Character and word counts of a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharStats {
    pub total: usize,
    pub without_spaces: usize,
    /// ASCII letters plus Latin-1 letters (`À` through `ÿ`)
    pub letters: usize,
    pub words: usize,
}

/// Counts of one labelled EPUB
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledStats {
    pub label: String,
    pub stats: CharStats,
}

impl LabeledStats {
    pub fn new(label: impl Into<String>, stats: CharStats) -> Self {
        Self {
            label: label.into(),
            stats,
        }
    }
}

/// Total-character difference of one EPUB against the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub label: String,
    pub diff: i64,
    pub percent: f64,
}

/// Kind of text found only in the compared EPUB
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SegmentCategory {
    License,
    Metadata,
    Navigation,
    Formatting,
    Other,
}

impl SegmentCategory {
    pub const ALL: [SegmentCategory; 5] = [
        SegmentCategory::License,
        SegmentCategory::Metadata,
        SegmentCategory::Navigation,
        SegmentCategory::Formatting,
        SegmentCategory::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SegmentCategory::License => "License and copyright",
            SegmentCategory::Metadata => "Edition metadata",
            SegmentCategory::Navigation => "Navigation and structure",
            SegmentCategory::Formatting => "Formatting and CSS",
            SegmentCategory::Other => "Other",
        }
    }

    /// First category whose keywords occur in `text`
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
        if hit(LICENSE_KEYWORDS) {
            SegmentCategory::License
        } else if hit(METADATA_KEYWORDS) {
            SegmentCategory::Metadata
        } else if hit(NAVIGATION_KEYWORDS) {
            SegmentCategory::Navigation
        } else if hit(FORMATTING_KEYWORDS) {
            SegmentCategory::Formatting
        } else {
            SegmentCategory::Other
        }
    }
}

impl std::fmt::Display for SegmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A sentence present only in the compared text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedSegment {
    pub text: String,
    /// Length of `text` in characters
    pub length: usize,
    /// How many of its words never occur in the baseline
    pub unique_words: usize,
    pub category: SegmentCategory,
}

/// Result of an added-content search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddedContent {
    pub segments: Vec<AddedSegment>,
    /// Normalized words of the compared text missing from the baseline
    pub unique_words: BTreeSet<String>,
}

impl AddedContent {
    pub fn in_category(&self, category: SegmentCategory) -> impl Iterator<Item = &AddedSegment> {
        self.segments.iter().filter(move |s| s.category == category)
    }
}

/// One navPoint and whether its target exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavCheck {
    pub point: NavPoint,
    /// Archive path the `src` resolves to
    pub target: String,
    pub found: bool,
}

/// Navigation verification outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavReport {
    pub ncx_path: String,
    pub checks: Vec<NavCheck>,
}

impl NavReport {
    pub fn found(&self) -> usize {
        self.checks.iter().filter(|c| c.found).count()
    }

    pub fn missing(&self) -> impl Iterator<Item = &NavCheck> {
        self.checks.iter().filter(|c| !c.found)
    }

    /// Every navPoint target exists
    pub fn is_ok(&self) -> bool {
        self.checks.iter().all(|c| c.found)
    }
}
