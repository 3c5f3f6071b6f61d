//! Book persistence
//!
//! Pretty-printed JSON on disk. Writes go through a temporary file in the
//! target directory and are renamed into place.

use super::types::{Book, DocumentError, Result};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Path of the backup written next to `path`: `<stem><suffix>.json`
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());
    path.with_file_name(format!("{stem}{suffix}.{ext}"))
}

impl Book {
    /// Parse a book from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_array() {
            return Err(DocumentError::NotABook);
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize with two-space indentation, non-ASCII kept verbatim
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a book from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            parts = book.parts.len(),
            chapters = book.chapter_count(),
            "loaded book"
        );
        Ok(book)
    }

    /// Write the book to `path`, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string()?;
        let write_err = |source: std::io::Error| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        debug!(path = %path.display(), bytes = json.len(), "saved book");
        Ok(())
    }

    /// Save, first copying an existing target to its backup path
    ///
    /// Returns the backup path when one was written.
    pub fn save_with_backup(&self, path: &Path, suffix: &str) -> Result<Option<PathBuf>> {
        let backup = if path.exists() {
            let backup = backup_path(path, suffix);
            std::fs::copy(path, &backup).map_err(|source| DocumentError::Write {
                path: backup.clone(),
                source,
            })?;
            info!(backup = %backup.display(), "backup written");
            Some(backup)
        } else {
            None
        };
        self.save(path)?;
        Ok(backup)
    }
}
