//! Highlight fragment extraction.

use crate::config::HighlightConfig;
use crate::document::Field;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Marked excerpts of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub field: Field,
    pub fragments: Vec<String>,
}

/// Cuts bounded windows around matches and marks every occurrence inside them.
#[derive(Debug, Clone)]
pub struct Highlighter<'a> {
    config: &'a HighlightConfig,
}

impl<'a> Highlighter<'a> {
    pub const fn new(config: &'a HighlightConfig) -> Self {
        Self { config }
    }

    /// Fragments for up to `max_fragments` occurrences of `term` in `text`.
    ///
    /// Matching is case-insensitive. Each window keeps `context_chars` characters on
    /// either side of its match, clamped to the text, with an ellipsis wherever it was
    /// clamped. An empty result means there is nothing to highlight.
    pub fn fragments(&self, text: &str, term: &str) -> Vec<String> {
        let Some(pattern) = term_regex(term) else {
            return vec![];
        };

        pattern
            .find_iter(text)
            .take(self.config.max_fragments)
            .map(|m| {
                let start = back_chars(text, m.start(), self.config.context_chars);
                let end = forward_chars(text, m.end(), self.config.context_chars);
                self.render(text, start, end, &pattern)
            })
            .collect()
    }

    /// Highlight entry for `field`, or `None` when no fragment was produced.
    pub fn highlight(&self, field: Field, text: &str, term: &str) -> Option<Highlight> {
        let fragments = self.fragments(text, term);
        (!fragments.is_empty()).then_some(Highlight { field, fragments })
    }

    fn render(&self, text: &str, start: usize, end: usize, pattern: &Regex) -> String {
        let window = &text[start..end];
        let mut fragment = String::with_capacity(window.len() + 32);

        if start > 0 {
            fragment.push_str(&self.config.ellipsis);
        }

        let mut last = 0;
        for m in pattern.find_iter(window) {
            fragment.push_str(&window[last..m.start()]);
            fragment.push_str(&self.config.pre_tag);
            fragment.push_str(m.as_str());
            fragment.push_str(&self.config.post_tag);
            last = m.end();
        }
        fragment.push_str(&window[last..]);

        if end < text.len() {
            fragment.push_str(&self.config.ellipsis);
        }
        fragment
    }
}

fn term_regex(term: &str) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Byte offset `count` characters before `from`, clamped to 0.
fn back_chars(text: &str, from: usize, count: usize) -> usize {
    if count == 0 {
        return from;
    }
    text[..from]
        .char_indices()
        .rev()
        .nth(count - 1)
        .map_or(0, |(i, _)| i)
}

/// Byte offset `count` characters after `from`, clamped to the text length.
fn forward_chars(text: &str, from: usize, count: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(i, _)| from + i)
}
