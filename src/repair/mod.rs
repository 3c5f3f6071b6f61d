//! Structural repair passes
//!
//! Small in-place fixes applied to a book document after alignment.
//!
//! # Features
//!
//! - Split `PART THE FIRST - SUBTITLE` titles into title and subtitle
//! - Ordered literal corrections over titles and item text
//!
//! # Example
//!
//! ```rust,no_run
//! use bookmend::{split_part_titles, apply_corrections, Book, CorrectionRule, TitleRules};
//! use std::path::Path;
//!
//! let mut book = Book::load(Path::new("book.json")).unwrap();
//! let parts = split_part_titles(&mut book, &TitleRules::default());
//! let stats = apply_corrections(&mut book, &[CorrectionRule::new("Devotlon", "Devotion")]);
//! println!("{} parts split, {} replacements", parts, stats.replacements);
//! ```

mod corrections;
mod titles;

pub use corrections::{apply_corrections, CorrectionRule, CorrectionStats};
pub use titles::{sentence_case, split_part_title, split_part_titles, TitleRules};
