//! EPUB text diagnostics
//!
//! Read-only checks run on finished EPUBs: how much text each one holds,
//! what a derived edition added, and whether its navigation resolves.
//!
//! # Features
//!
//! - Plain text extraction over every markup entry
//! - Character, letter and word counts against a baseline
//! - Added-sentence search with keyword classification
//! - NCX navPoint target verification
//!
//! # Example
//!
//! ```rust,no_run
//! use bookmend::compare::{extract_plain_text, find_added_segments, CharStats};
//! use bookmend::epub::EpubArchive;
//! use std::path::Path;
//!
//! let mut original = EpubArchive::open(Path::new("original.epub")).unwrap();
//! let mut derived = EpubArchive::open(Path::new("derived.epub")).unwrap();
//! let a = extract_plain_text(&mut original).unwrap();
//! let b = extract_plain_text(&mut derived).unwrap();
//!
//! println!("{:?}", CharStats::of(&b.text));
//! let added = find_added_segments(&a.text, &b.text);
//! println!("{} added sentences", added.segments.len());
//! ```

mod added;
mod nav;
mod plain;
mod stats;
mod types;

pub use added::{find_added_segments, normalize_for_diff};
pub use nav::verify_navigation;
pub use plain::{extract_plain_text, is_text_entry, markup_to_text};
pub use stats::{compare, difference, Comparison};
pub use types::{
    AddedContent, AddedSegment, CharStats, CompareError, Difference, DocumentText, LabeledStats,
    NavCheck, NavReport, PlainText, Result, SegmentCategory, EXCLUDED_DIR, EXCLUDED_SUFFIXES,
    MIN_SEGMENT_CHARS,
};
