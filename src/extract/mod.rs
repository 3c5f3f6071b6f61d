//! EPUB extraction module
//!
//! Turns an EPUB into the book JSON model: one part per content
//! document, chapters opened at headings, one item per paragraph.
//!
//! # Features
//!
//! - Spine-ordered discovery with a name-based fallback
//! - Chapter detection from `CHAPTER <roman>` text and short `h1`/`h2`
//! - Short-fragment filtering
//! - Per-run statistics
//!
//! # Example
//!
//! ```rust,no_run
//! use bookmend::{EpubExtractor, ExtractOptions, NoProgress};
//! use std::path::Path;
//!
//! let result = EpubExtractor::extract(
//!     Path::new("book.epub"),
//!     &ExtractOptions::default(),
//!     &NoProgress,
//! )
//! .unwrap();
//! println!("{} chapters", result.stats.chapters);
//! result.book.save(Path::new("book.json")).unwrap();
//! ```

mod markup;
mod types;

pub use markup::{looks_like_chapter_heading, MarkupParser};
pub use types::{
    DiscoveryMode, ExtractError, ExtractOptions, ExtractOptionsBuilder, ExtractResult,
    ExtractStats, Result, CONTENT_NAME_HINTS, DEFAULT_MAX_CHAPTER_TITLE_CHARS,
    DEFAULT_MAX_PART_TITLE_CHARS, DEFAULT_MIN_ITEM_CHARS, UNTITLED_CHAPTER,
};

use crate::document::Book;
use crate::epub::{is_markup_name, EpubArchive};
use crate::progress::{ProcessingStage, ProgressCallback};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

/// Markup entries whose file name mentions content or chapter, sorted
pub fn name_heuristic_documents(names: &[String]) -> Vec<String> {
    let mut docs: Vec<String> = names
        .iter()
        .filter(|name| is_markup_name(name))
        .filter(|name| {
            let file = name.rsplit('/').next().unwrap_or(name).to_lowercase();
            CONTENT_NAME_HINTS.iter().any(|hint| file.contains(hint))
        })
        .cloned()
        .collect();
    docs.sort();
    docs
}

/// EPUB to book extractor
pub struct EpubExtractor;

impl EpubExtractor {
    /// Extract a book from an EPUB file
    pub fn extract(
        path: &Path,
        options: &ExtractOptions,
        progress: &dyn ProgressCallback,
    ) -> Result<ExtractResult> {
        progress.on_stage(ProcessingStage::Loading, 0);
        let mut archive = EpubArchive::open(path)?;
        Self::extract_archive(&mut archive, path, options, progress)
    }

    /// Extract from an already opened archive; `source` is used in messages
    pub fn extract_archive<R: Read + Seek>(
        archive: &mut EpubArchive<R>,
        source: &Path,
        options: &ExtractOptions,
        progress: &dyn ProgressCallback,
    ) -> Result<ExtractResult> {
        let documents = Self::content_documents(archive, options);
        if documents.is_empty() {
            return Err(ExtractError::NoContentDocuments(source.to_path_buf()));
        }
        info!(documents = documents.len(), "extracting content documents");

        let parser = MarkupParser::new();
        let mut book = Book::default();
        let mut stats = ExtractStats::default();

        progress.on_stage(ProcessingStage::Extracting, documents.len());
        for (index, name) in documents.iter().enumerate() {
            stats.documents += 1;
            let html = match archive.read_text(name) {
                Ok(html) => html,
                Err(e) => {
                    warn!(document = %name, error = %e, "skipping unreadable document");
                    stats.skipped_documents += 1;
                    progress.on_progress(index + 1, name);
                    continue;
                }
            };

            let part = parser.parse_part(&html, index, options);
            if part.chapters.is_empty() {
                debug!(document = %name, "no chapters found");
                stats.skipped_documents += 1;
            } else {
                debug!(document = %name, chapters = part.chapters.len(), "parsed document");
                book.parts.push(part);
            }
            progress.on_progress(index + 1, name);
        }

        if book.is_empty() {
            return Err(ExtractError::NothingExtracted(source.to_path_buf()));
        }

        stats.parts = book.parts.len();
        stats.chapters = book.chapter_count();
        stats.items = book.item_count();
        stats.words = book.word_count();
        progress.on_stage_complete(
            ProcessingStage::Extracting,
            &format!("{} parts, {} chapters", stats.parts, stats.chapters),
        );

        Ok(ExtractResult { book, stats })
    }

    /// Content documents in reading order for the configured discovery mode
    pub fn content_documents<R: Read + Seek>(
        archive: &mut EpubArchive<R>,
        options: &ExtractOptions,
    ) -> Vec<String> {
        if options.discovery == DiscoveryMode::Spine {
            match archive.package() {
                Ok(package) => {
                    let docs = package.spine_documents();
                    if !docs.is_empty() {
                        return docs;
                    }
                    warn!("spine lists no markup documents, falling back to name matching");
                }
                Err(e) => warn!(error = %e, "cannot read package, falling back to name matching"),
            }
        }
        name_heuristic_documents(&archive.names())
    }
}
