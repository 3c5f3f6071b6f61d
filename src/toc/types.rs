//! Table of contents core types

use super::roman::parse_chapter_number;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Required CSV header for the part key
pub const COLUMN_PART: &str = "Part";

/// Required CSV header for the chapter number
pub const COLUMN_CHAPTER: &str = "Chapter";

/// Required CSV header for the chapter title
pub const COLUMN_TITLE: &str = "Title";

/// Optional CSV header for the printed page
pub const COLUMN_PAGE: &str = "Page";

// ============================================================
// Error Types
// ============================================================

/// Table of contents error types
#[derive(Debug, Error)]
pub enum TocError {
    #[error("TOC file not found: {0}")]
    NotFound(PathBuf),

    #[error("TOC is missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TocError>;

// ============================================================
// Core Data Structures
// ============================================================

/// One row of the reference table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Part key as written in the CSV (`I`..`V`)
    pub part: String,
    /// Chapter number as written (roman, restarting per part)
    pub chapter: String,
    pub title: String,
    pub page: Option<String>,
}

impl TocEntry {
    pub fn new(part: impl Into<String>, chapter: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            chapter: chapter.into(),
            title: title.into(),
            page: None,
        }
    }

    /// Chapter number within its part
    pub fn number(&self) -> Option<u32> {
        parse_chapter_number(&self.chapter)
    }

    /// Chapter title as it appears in an aligned document
    pub fn heading(&self) -> String {
        format!("CHAPTER {}. {}", self.chapter, self.title)
    }
}

/// Ordered reference table of contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
    entries: Vec<TocEntry>,
}

impl TableOfContents {
    pub fn new(entries: Vec<TocEntry>) -> Self {
        Self { entries }
    }

    /// Entries in file order
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Part keys in order of first appearance
    pub fn part_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !keys.contains(&entry.part.as_str()) {
                keys.push(&entry.part);
            }
        }
        keys
    }

    /// Entries belonging to one part, in file order
    pub fn chapters_in<'a>(&'a self, part: &'a str) -> impl Iterator<Item = &'a TocEntry> + 'a {
        self.entries.iter().filter(move |e| e.part == part)
    }

    /// Headings of every entry, in file order
    pub fn headings(&self) -> Vec<String> {
        self.entries.iter().map(TocEntry::heading).collect()
    }
}
