//! Plain text extraction from every markup entry

use super::types::{DocumentText, PlainText, Result, EXCLUDED_DIR, EXCLUDED_SUFFIXES};
use crate::epub::{is_markup_name, EpubArchive};
use crate::text::collapse_whitespace;
use scraper::Html;
use std::io::{Read, Seek};
use tracing::{debug, warn};

/// Whether an archive entry counts as book text
pub fn is_text_entry(name: &str) -> bool {
    is_markup_name(name)
        && !name.contains(EXCLUDED_DIR)
        && !EXCLUDED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Markup stripped, entities decoded, whitespace collapsed
pub fn markup_to_text(markup: &str) -> String {
    let doc = Html::parse_document(markup);
    let raw: String = doc.root_element().text().collect();
    collapse_whitespace(&raw)
}

/// Text of every book document in name order
///
/// Entries that cannot be read are logged and skipped.
pub fn extract_plain_text<R: Read + Seek>(archive: &mut EpubArchive<R>) -> Result<PlainText> {
    let mut texts: Vec<String> = Vec::new();
    let mut documents = Vec::new();

    for name in archive.names().into_iter().filter(|n| is_text_entry(n)) {
        let markup = match archive.read_text(&name) {
            Ok(markup) => markup,
            Err(e) => {
                warn!(entry = %name, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let text = markup_to_text(&markup);
        if text.is_empty() {
            continue;
        }
        let chars = text.chars().count();
        debug!(entry = %name, chars, "extracted text");
        documents.push(DocumentText { name, chars });
        texts.push(text);
    }

    Ok(PlainText {
        text: texts.join(" "),
        documents,
    })
}
