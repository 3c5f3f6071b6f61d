//! EPUB container core types

use std::path::PathBuf;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// OCF container descriptor
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// NCX location used when the package does not declare one
pub const DEFAULT_NCX_PATH: &str = "OEBPS/toc.ncx";

/// Media type of the NCX navigation document
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// Extensions treated as markup documents
pub const MARKUP_EXTENSIONS: [&str; 3] = [".xhtml", ".html", ".xml"];

// ============================================================
// Error Types
// ============================================================

/// EPUB container error types
#[derive(Debug, Error)]
pub enum EpubError {
    #[error("EPUB not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid EPUB archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Missing archive entry: {0}")]
    MissingEntry(String),

    #[error("No rootfile declared in {CONTAINER_PATH}")]
    NoRootfile,

    #[error("XML error in {entry}: {message}")]
    Xml { entry: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EpubError {
    pub(crate) fn xml(entry: &str, err: impl std::fmt::Display) -> Self {
        EpubError::Xml {
            entry: entry.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EpubError>;

// ============================================================
// Core Data Structures
// ============================================================

/// Manifest entry of the OPF package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    /// Archive path, already resolved against the OPF location
    pub path: String,
    pub media_type: String,
}

impl ManifestItem {
    pub fn is_markup(&self) -> bool {
        self.media_type.contains("html") || is_markup_name(&self.path)
    }
}

/// Navigation point of an NCX document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    pub id: String,
    pub play_order: Option<u32>,
    pub label: String,
    /// `src` as written in the NCX
    pub src: String,
    /// Nesting depth, 0 for top-level points
    pub depth: usize,
}

/// Whether an archive entry name looks like a markup document
pub fn is_markup_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    MARKUP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Resolve `href` relative to the directory of the archive entry `base`
///
/// Fragments are dropped and `.`/`..` segments are folded.
pub fn resolve_href(base: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or("");
    let mut segments: Vec<&str> = base.split('/').collect();
    segments.pop();

    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.retain(|s| !s.is_empty());
    segments.join("/")
}
