//! bookmend - EPUB text extraction and chapter reconciliation
//!
//! Turns an EPUB into a JSON book model (parts, chapters, content items),
//! repairs its structure, and realigns its chapters against a
//! hand-maintained table of contents.
//!
//! # Modules
//!
//! - [`document`]: book model, persistence and structure analysis
//! - [`toc`]: reference table of contents from CSV
//! - [`epub`]: read-only EPUB container access
//! - [`extract`]: EPUB to book extraction
//! - [`align`]: chapter dedup, matching and reassembly
//! - [`repair`]: part title splitting and text corrections
//! - [`compare`]: text statistics, added content and navigation checks
//! - [`config`]: TOML configuration
//! - [`progress`]: stage reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use bookmend::{
//!     AlignOptions, ChapterAligner, EpubExtractor, ExtractOptions, NoProgress, TableOfContents,
//! };
//! use std::path::Path;
//!
//! let extracted = EpubExtractor::extract(
//!     Path::new("book.epub"),
//!     &ExtractOptions::default(),
//!     &NoProgress,
//! )
//! .unwrap();
//! let toc = TableOfContents::load(Path::new("toc.csv")).unwrap();
//! let aligned =
//!     ChapterAligner::align(&extracted.book, &toc, &AlignOptions::default(), &NoProgress).unwrap();
//! aligned.book.save(Path::new("book.json")).unwrap();
//! ```

pub mod align;
pub mod cli;
pub mod compare;
pub mod config;
pub mod document;
pub mod epub;
pub mod extract;
pub mod progress;
pub mod repair;
pub mod text;
pub mod toc;

// Document
pub use document::{
    backup_path, count_words, Book, Chapter, ContentItem, DocumentError, Part, StructureReport,
    TocComparison,
};

// Table of contents
pub use toc::{chapter_number_from_title, parse_roman, to_roman, TableOfContents, TocEntry, TocError};

// Extraction
pub use extract::{DiscoveryMode, EpubExtractor, ExtractError, ExtractOptions, ExtractResult};

// Alignment
pub use align::{
    AlignError, AlignOptions, AlignReport, AlignResult, ChapterAligner, DedupStrategy,
    MatchMethod, MatchStrategy, SectionRule,
};

// Repair
pub use repair::{apply_corrections, split_part_titles, CorrectionRule, CorrectionStats, TitleRules};

// Comparison
pub use compare::{CharStats, CompareError, NavReport, SegmentCategory};

// CLI and config
pub use cli::{Cli, Commands, ExitCode};
pub use config::{CliOverrides, Config, ConfigError};

// Progress
pub use progress::{NoProgress, OutputMode, ProcessingStage, ProgressCallback, ProgressTracker, RunSummary};

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGS: i32 = 2;
    pub const INPUT_NOT_FOUND: i32 = 3;
    pub const OUTPUT_ERROR: i32 = 4;
    pub const PROCESSING_ERROR: i32 = 5;
}
