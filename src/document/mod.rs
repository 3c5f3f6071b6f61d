//! Book document module
//!
//! The shared JSON artifact every pass reads and writes: parts holding
//! chapters holding content items.
//!
//! # Features
//!
//! - Lossless JSON round-trip (unknown keys preserved)
//! - Atomic saves with optional backup of the previous file
//! - Derived word counts
//! - Structure report with optional TOC comparison
//!
//! # Example
//!
//! ```rust,no_run
//! use bookmend::{Book, StructureReport};
//! use std::path::Path;
//!
//! let mut book = Book::load(Path::new("book.json")).unwrap();
//! let changed = book.recompute_word_counts();
//! println!("{} stale counts fixed", changed);
//!
//! let report = StructureReport::analyze(&book, None);
//! println!("{} duplicated titles", report.duplicate_titles.len());
//! book.save_with_backup(Path::new("book.json"), "_backup").unwrap();
//! ```

mod analysis;
mod store;
mod types;

pub use analysis::{Location, PartSummary, StructureReport, TocComparison};
pub use store::backup_path;
pub use types::{
    count_words, Book, Chapter, ContentItem, DocumentError, Part, Result, DEFAULT_BACKUP_SUFFIX,
    DEFAULT_ITEM_TYPE,
};
