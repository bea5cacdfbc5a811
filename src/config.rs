//! Search tuning knobs: field weights, highlight rendering, result limit.

use crate::document::Field;
use crate::error::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of results returned by [`SearchIndex::search`](crate::SearchIndex::search).
pub const DEFAULT_RESULT_LIMIT: usize = 20;

/// Per-field score multipliers.
///
/// Titles and tags are weighted above body text so that a hit in a heading
/// outranks a passing mention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub tags: f64,
    pub path: f64,
    pub description: f64,
    pub content: f64,
    pub author: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 3.0,
            tags: 2.5,
            path: 2.0,
            description: 1.5,
            content: 1.0,
            author: 1.0,
        }
    }
}

impl FieldWeights {
    /// Weight applied to matches in `field`.
    pub const fn weight(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title,
            Field::Tags => self.tags,
            Field::Path => self.path,
            Field::Description => self.description,
            Field::Content => self.content,
            Field::Author => self.author,
        }
    }
}

/// How highlight fragments are cut and marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Characters of context kept on each side of a match.
    pub context_chars: usize,
    /// Maximum number of fragments produced per field.
    pub max_fragments: usize,
    pub pre_tag: String,
    pub post_tag: String,
    /// Marker added where a fragment was clamped.
    pub ellipsis: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            context_chars: 50,
            max_fragments: 3,
            pre_tag: "<mark>".to_string(),
            post_tag: "</mark>".to_string(),
            ellipsis: "...".to_string(),
        }
    }
}

/// Complete search configuration. Every key is optional when loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub weights: FieldWeights,
    pub highlight: HighlightConfig,
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            highlight: HighlightConfig::default(),
            default_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

impl SearchConfig {
    /// Parse a configuration from TOML text.
    ///
    /// ```toml
    /// default_limit = 50
    ///
    /// [weights]
    /// title = 4.0
    ///
    /// [highlight]
    /// pre_tag = "<em>"
    /// post_tag = "</em>"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse search configuration")
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read search configuration at {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid search configuration in {}", path.display()))?;
        tracing::debug!("Loaded search configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(Field::Title, 3.0)]
    #[case(Field::Tags, 2.5)]
    #[case(Field::Path, 2.0)]
    #[case(Field::Description, 1.5)]
    #[case(Field::Content, 1.0)]
    #[case(Field::Author, 1.0)]
    fn test_default_weights(#[case] field: Field, #[case] expected: f64) {
        check!(FieldWeights::default().weight(field) == expected);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SearchConfig::from_toml_str(
            "default_limit = 5\n[weights]\ntitle = 10.0\n[highlight]\npre_tag = \"<b>\"\n",
        )
        .unwrap();

        check!(config.default_limit == 5);
        check!(config.weights.title == 10.0);
        check!(config.weights.tags == 2.5);
        check!(config.highlight.pre_tag == "<b>");
        check!(config.highlight.post_tag == "</mark>");
        check!(config.highlight.context_chars == 50);
    }

    #[test]
    fn test_empty_toml_is_default() {
        check!(SearchConfig::from_toml_str("").unwrap() == SearchConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        check!(SearchConfig::from_toml_str("default_limit = \"many\"").is_err());
    }
}
