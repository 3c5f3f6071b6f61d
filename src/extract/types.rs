//! Extraction core types

use crate::document::Book;
use crate::epub::EpubError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Paragraphs this short or shorter are dropped
pub const DEFAULT_MIN_ITEM_CHARS: usize = 10;

/// `h1`/`h2` text shorter than this opens a chapter
pub const DEFAULT_MAX_CHAPTER_TITLE_CHARS: usize = 100;

/// Document headings shorter than this name the part
pub const DEFAULT_MAX_PART_TITLE_CHARS: usize = 200;

/// Title given to paragraphs that precede any heading
pub const UNTITLED_CHAPTER: &str = "Content";

/// Name fragments selecting content documents in name-heuristic mode
pub const CONTENT_NAME_HINTS: [&str; 2] = ["content", "chapter"];

// ============================================================
// Error Types
// ============================================================

/// Extraction error types
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Epub(#[from] EpubError),

    #[error("No content documents found in {0}")]
    NoContentDocuments(PathBuf),

    #[error("No chapters extracted from {0}")]
    NothingExtracted(PathBuf),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

// ============================================================
// Options
// ============================================================

/// How content documents are located inside the archive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMode {
    /// Reading order from the OPF spine
    #[default]
    Spine,
    /// Entries whose names mention content or chapter, sorted by name
    NameHeuristic,
}

/// Extraction options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub discovery: DiscoveryMode,
    pub min_item_chars: usize,
    pub max_chapter_title_chars: usize,
    pub max_part_title_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            discovery: DiscoveryMode::Spine,
            min_item_chars: DEFAULT_MIN_ITEM_CHARS,
            max_chapter_title_chars: DEFAULT_MAX_CHAPTER_TITLE_CHARS,
            max_part_title_chars: DEFAULT_MAX_PART_TITLE_CHARS,
        }
    }
}

impl ExtractOptions {
    pub fn builder() -> ExtractOptionsBuilder {
        ExtractOptionsBuilder::default()
    }

    /// Name-based discovery, for archives with a broken or missing spine
    pub fn by_name() -> Self {
        Self {
            discovery: DiscoveryMode::NameHeuristic,
            ..Default::default()
        }
    }
}

/// Builder for ExtractOptions
#[derive(Debug, Default)]
pub struct ExtractOptionsBuilder {
    options: ExtractOptions,
}

impl ExtractOptionsBuilder {
    #[must_use]
    pub fn discovery(mut self, mode: DiscoveryMode) -> Self {
        self.options.discovery = mode;
        self
    }

    #[must_use]
    pub fn min_item_chars(mut self, chars: usize) -> Self {
        self.options.min_item_chars = chars;
        self
    }

    /// Set the `h1`/`h2` chapter title limit (at least 1)
    #[must_use]
    pub fn max_chapter_title_chars(mut self, chars: usize) -> Self {
        self.options.max_chapter_title_chars = chars.max(1);
        self
    }

    #[must_use]
    pub fn max_part_title_chars(mut self, chars: usize) -> Self {
        self.options.max_part_title_chars = chars.max(1);
        self
    }

    #[must_use]
    pub fn build(self) -> ExtractOptions {
        self.options
    }
}

// ============================================================
// Results
// ============================================================

/// Extraction statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// Content documents read
    pub documents: usize,
    /// Documents that failed to read or produced no chapters
    pub skipped_documents: usize,
    pub parts: usize,
    pub chapters: usize,
    pub items: usize,
    pub words: usize,
}

/// Extracted book plus statistics
#[derive(Debug, Clone)]
pub struct ExtractResult {
    pub book: Book,
    pub stats: ExtractStats,
}
