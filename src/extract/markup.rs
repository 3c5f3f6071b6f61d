//! Markup document to part conversion

use super::types::{ExtractOptions, UNTITLED_CHAPTER};
use crate::document::{Chapter, ContentItem, Part};
use crate::text::collapse_whitespace;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static CHAPTER_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^chapter\s+(?:[ivxlcdm]+\b|\d+)").expect("chapter heading pattern is valid")
});

/// Whether text reads like a chapter heading (`CHAPTER IV`, `Chapter 12`)
pub fn looks_like_chapter_heading(text: &str) -> bool {
    CHAPTER_HEADING.is_match(text)
}

/// Text nodes concatenated as-is, so inline tags never split a word
fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Splits one XHTML document into a part with chapters
pub struct MarkupParser {
    blocks: Selector,
    titles: Selector,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupParser {
    pub fn new() -> Self {
        Self {
            blocks: Selector::parse("p, div, h1, h2, h3").expect("block selector is valid"),
            titles: Selector::parse("h1, h2, title").expect("title selector is valid"),
        }
    }

    /// Parse a document; `index` is its 0-based position in reading order
    ///
    /// The returned part may have no chapters.
    pub fn parse_part(&self, html: &str, index: usize, options: &ExtractOptions) -> Part {
        let doc = Html::parse_document(html);
        let part_title = self.part_title(&doc, options).unwrap_or_else(|| format!("Part {}", index + 1));

        let mut chapters: Vec<Chapter> = Vec::new();
        for element in doc.select(&self.blocks) {
            let text = element_text(&element);
            if text.is_empty() {
                continue;
            }
            let tag = element.value().name();

            if self.is_chapter_heading(tag, &text, options) {
                // nested wrappers repeat the same heading
                let repeated = chapters
                    .last()
                    .is_some_and(|c| c.is_empty() && c.chapter_title == text);
                if !repeated {
                    chapters.push(Chapter::new(text, Vec::new()));
                }
                continue;
            }

            if tag == "p" && text.chars().count() > options.min_item_chars {
                if chapters.is_empty() {
                    chapters.push(Chapter::new(UNTITLED_CHAPTER, Vec::new()));
                }
                if let Some(chapter) = chapters.last_mut() {
                    chapter.content.push(ContentItem::paragraph(text));
                }
            }
        }

        Part::new(part_title, chapters)
    }

    fn part_title(&self, doc: &Html, options: &ExtractOptions) -> Option<String> {
        let first = doc.select(&self.titles).next()?;
        Some(element_text(&first))
            .filter(|t| !t.is_empty() && t.chars().count() < options.max_part_title_chars)
    }

    fn is_chapter_heading(&self, tag: &str, text: &str, options: &ExtractOptions) -> bool {
        looks_like_chapter_heading(text)
            || (matches!(tag, "h1" | "h2") && text.chars().count() < options.max_chapter_title_chars)
    }
}
