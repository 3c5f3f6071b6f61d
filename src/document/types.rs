//! Book document core types
//!
//! The on-disk model is a JSON array of parts, each holding chapters,
//! each holding content items. Keys this crate does not know about are
//! carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Item type assigned when the source omits one
pub const DEFAULT_ITEM_TYPE: &str = "p";

/// Backup suffix used by passes that rewrite a document in place
pub const DEFAULT_BACKUP_SUFFIX: &str = "_backup";

// ============================================================
// Error Types
// ============================================================

/// Document error types
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not a book document: top level must be an array of parts")]
    NotABook,
}

pub type Result<T> = std::result::Result<T, DocumentError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

fn default_item_type() -> String {
    DEFAULT_ITEM_TYPE.to_string()
}

/// One paragraph or heading of book text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type", default = "default_item_type")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub word_count: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentItem {
    /// Create a paragraph item with its word count filled in
    pub fn paragraph(text: impl Into<String>) -> Self {
        let content = text.into();
        Self {
            kind: default_item_type(),
            word_count: count_words(&content),
            content,
            extra: Map::new(),
        }
    }

    /// Whether this item is a plain paragraph
    pub fn is_paragraph(&self) -> bool {
        self.kind == DEFAULT_ITEM_TYPE
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Replace the text and refresh the word count
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.word_count = count_words(&self.content);
    }

    /// Recompute the word count, returning true when it changed
    pub fn refresh_word_count(&mut self) -> bool {
        let fresh = count_words(&self.content);
        let changed = fresh != self.word_count;
        self.word_count = fresh;
        changed
    }
}

/// A titled, ordered run of content items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub chapter_title: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: Vec<ContentItem>) -> Self {
        Self {
            chapter_title: title.into(),
            content,
            extra: Map::new(),
        }
    }

    /// A chapter with no content items at all
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Sum of stored word counts
    pub fn word_count(&self) -> usize {
        self.content.iter().map(|item| item.word_count).sum()
    }

    /// First item text, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|item| item.content.as_str())
    }
}

/// Top-level grouping of chapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub part_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_subtitle: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Part {
    pub fn new(title: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            part_title: title.into(),
            part_subtitle: None,
            chapters,
            extra: Map::new(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.chapters.iter().map(|c| c.content.len()).sum()
    }

    pub fn word_count(&self) -> usize {
        self.chapters.iter().map(Chapter::word_count).sum()
    }
}

/// A whole book: the ordered list of parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Book {
    pub parts: Vec<Part>,
}

impl Book {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Iterate chapters in reading order with their (part, chapter) indices
    pub fn chapters(&self) -> impl Iterator<Item = (usize, usize, &Chapter)> {
        self.parts.iter().enumerate().flat_map(|(pi, part)| {
            part.chapters
                .iter()
                .enumerate()
                .map(move |(ci, chapter)| (pi, ci, chapter))
        })
    }

    pub fn chapter_count(&self) -> usize {
        self.parts.iter().map(|p| p.chapters.len()).sum()
    }

    pub fn item_count(&self) -> usize {
        self.parts.iter().map(Part::item_count).sum()
    }

    pub fn word_count(&self) -> usize {
        self.parts.iter().map(Part::word_count).sum()
    }

    /// Recompute every item's word count, returning how many changed
    pub fn recompute_word_counts(&mut self) -> usize {
        let mut changed = 0;
        for part in &mut self.parts {
            for chapter in &mut part.chapters {
                for item in &mut chapter.content {
                    if item.refresh_word_count() {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }
}
