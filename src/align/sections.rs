//! Front-matter splitting
//!
//! Rules are consumed in order. A rule with a `heading` is armed when that
//! heading paragraph appears and opens at its `begin` paragraph; a rule
//! without one opens directly at its `begin` paragraph. An open rule
//! collects paragraphs until its `end` paragraph (inclusive) or until the
//! next rule takes over. Paragraphs outside every open rule are dropped.

use super::types::{FrontSection, SectionRule};
use crate::document::ContentItem;

fn contains(text: &str, needle: &Option<String>) -> Option<bool> {
    needle.as_deref().map(|n| text.contains(n))
}

/// Route paragraphs into one section per rule (sections may be empty)
pub fn split_front_matter(items: &[ContentItem], rules: &[SectionRule]) -> Vec<FrontSection> {
    let mut sections: Vec<FrontSection> = rules
        .iter()
        .map(|rule| FrontSection {
            title: rule.title.clone(),
            items: Vec::new(),
        })
        .collect();

    let mut active: Option<usize> = None;
    let mut armed: Option<usize> = None;
    let mut next = 0;

    for item in items.iter().filter(|item| !item.is_blank()) {
        let text = item.content.as_str();

        if let Some(rule) = rules.get(next) {
            if rule.heading.is_some() {
                if contains(text, &rule.heading) == Some(true) {
                    armed = Some(next);
                    active = None;
                    next += 1;
                    continue;
                }
            } else if armed.is_none() && contains(text, &rule.begin).unwrap_or(active.is_none()) {
                active = Some(next);
                next += 1;
            }
        }

        if let Some(r) = armed {
            if contains(text, &rules[r].begin).unwrap_or(true) {
                active = Some(r);
                armed = None;
            } else {
                continue;
            }
        }

        if let Some(a) = active {
            let rule = &rules[a];
            if contains(text, &rule.keep_only).unwrap_or(true) {
                sections[a].items.push(item.clone());
            }
            if contains(text, &rule.end) == Some(true) {
                active = None;
            }
        }
    }

    sections
}
