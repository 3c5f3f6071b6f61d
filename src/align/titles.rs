//! Removal of chapter labels repeated in the first paragraph

use crate::document::Chapter;
use crate::text::normalize_label;
use once_cell::sync::Lazy;
use regex::Regex;

static CHAPTER_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*CHAPTER\s+[IVXLCDM]+\.\s*(.+)$").expect("chapter label pattern is valid")
});

const LEADING_SEPARATORS: &[char] = &[' ', '.', ',', ':', ';', '-', '\u{2014}', '_'];

/// What happened to a chapter's first paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleCleanup {
    Unchanged,
    /// The paragraph was only the label and was removed
    Removed,
    /// The label was cut from the start of the paragraph
    Trimmed,
}

/// Label part of a `CHAPTER <roman>. <label>` title
pub fn chapter_label(title: &str) -> Option<&str> {
    CHAPTER_LABEL
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|label| !label.is_empty())
}

/// Strip the chapter label when the first paragraph repeats it
pub fn clean_repeated_title(chapter: &mut Chapter) -> TitleCleanup {
    let Some(label) = chapter_label(&chapter.chapter_title).map(str::to_string) else {
        return TitleCleanup::Unchanged;
    };
    let norm_label = normalize_label(&label);
    if norm_label.is_empty() {
        return TitleCleanup::Unchanged;
    }

    let Some(idx) = chapter
        .content
        .iter()
        .position(|item| item.is_paragraph() && !item.is_blank())
    else {
        return TitleCleanup::Unchanged;
    };

    let text = chapter.content[idx].content.clone();
    let norm_text = normalize_label(&text);

    let remainder = if norm_text == norm_label {
        String::new()
    } else if let Some(rest) = strip_literal_label(&text, &label) {
        rest
    } else if norm_text.starts_with(&format!("{norm_label} ")) {
        let skip = norm_label.split_whitespace().count();
        text.split_whitespace().skip(skip).collect::<Vec<_>>().join(" ")
    } else {
        return TitleCleanup::Unchanged;
    };

    if remainder.trim().is_empty() {
        chapter.content.remove(idx);
        TitleCleanup::Removed
    } else {
        chapter.content[idx].set_content(remainder);
        TitleCleanup::Trimmed
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || LEADING_SEPARATORS.contains(&c)
}

/// Text after a case-insensitive literal label prefix and its separators
fn strip_literal_label(text: &str, label: &str) -> Option<String> {
    let text = text.trim_start();
    let mut chars = text.char_indices();
    let mut end = 0;
    for expected in label.chars() {
        let (i, c) = chars.next()?;
        if !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = i + c.len_utf8();
    }

    let tail = &text[end..];
    match tail.chars().next() {
        None => Some(String::new()),
        Some(c) if is_separator(c) => Some(tail.trim_start_matches(is_separator).to_string()),
        Some(_) => None,
    }
}
