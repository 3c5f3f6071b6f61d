//! Reference table of contents
//!
//! The hand-maintained chapter list that extracted documents are checked
//! and realigned against.
//!
//! # Features
//!
//! - CSV loading with free column order
//! - Part keys in first-appearance order
//! - Roman numeral parsing and formatting
//! - Chapter numbers pulled out of free-form titles
//!
//! # Example
//!
//! ```rust,no_run
//! use bookmend::TableOfContents;
//! use std::path::Path;
//!
//! let toc = TableOfContents::load(Path::new("toc.csv")).unwrap();
//! for entry in toc.entries() {
//!     println!("{} -> {}", entry.part, entry.heading());
//! }
//! ```

mod reader;
mod roman;
mod types;

pub use roman::{chapter_number_from_title, parse_chapter_number, parse_roman, to_roman};
pub use types::{
    Result, TableOfContents, TocEntry, TocError, COLUMN_CHAPTER, COLUMN_PAGE, COLUMN_PART,
    COLUMN_TITLE,
};
