//! Content items handed to the indexer and the normalized documents it produces.

use crate::metadata::{Metadata, parse_front_matter};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Where a content item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    /// An interactive demo, optionally paired with a markdown write-up.
    #[default]
    Demo,
    /// A standalone markdown page.
    Markdown,
    /// A plain source file.
    Code,
}

impl DocKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Markdown => "markdown",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A searchable document field, addressable from the query language as `field:value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Content,
    Path,
    Tags,
    Description,
    Author,
}

impl Field {
    /// Fields scanned by unscoped terms and wildcards, in scan order.
    pub const ALL: [Self; 6] = [
        Self::Title,
        Self::Content,
        Self::Path,
        Self::Tags,
        Self::Description,
        Self::Author,
    ];

    /// Fields scanned by quoted phrases.
    pub const PHRASE: [Self; 3] = [Self::Title, Self::Content, Self::Description];

    /// Fields scanned by fuzzy terms. Tags are excluded.
    pub const FUZZY: [Self; 5] = [
        Self::Title,
        Self::Content,
        Self::Path,
        Self::Description,
        Self::Author,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Path => "path",
            Self::Tags => "tags",
            Self::Description => "description",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// A raw content item as supplied by a content source.
///
/// Only `name` is required. `markdown` may start with a front-matter block,
/// which is parsed into metadata and stripped before indexing; `raw_content`
/// (demo or code source) is appended to the searchable body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentItem {
    pub name: String,
    /// Routable location; falls back to `name`.
    pub path: Option<String>,
    pub kind: DocKind,
    pub tags: Vec<String>,
    pub markdown: Option<String>,
    pub raw_content: Option<String>,
}

impl ContentItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: DocKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    #[must_use]
    pub fn with_raw_content(mut self, raw: impl Into<String>) -> Self {
        self.raw_content = Some(raw.into());
        self
    }
}

/// Lower-cased copies of every field the evaluator reads.
#[derive(Debug, Clone, PartialEq)]
struct SearchableFields {
    title: String,
    path: String,
    tags: String,
    description: String,
    author: String,
}

/// A normalized, immutable document held by the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedDocument {
    pub id: usize,
    pub name: String,
    pub path: String,
    pub kind: DocKind,
    pub title: String,
    /// Lower-cased body with any front-matter block removed.
    pub content: String,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub metadata: Metadata,
    searchable: SearchableFields,
}

impl IndexedDocument {
    /// Normalize a content item into an indexed document with the given id.
    pub fn from_item(id: usize, item: &ContentItem) -> Self {
        let mut metadata = Metadata::new();
        let mut body = String::new();

        if let Some(markdown) = &item.markdown {
            let parsed = parse_front_matter(markdown);
            if let Some(error) = parsed.error {
                tracing::warn!(
                    "Malformed metadata in '{}', indexing with empty metadata: {}",
                    item.name,
                    error
                );
            }
            metadata = parsed.metadata;
            body = parsed.body.to_string();
        }

        if let Some(raw) = &item.raw_content {
            body.push('\n');
            body.push_str(raw);
        }

        let title = metadata_str(&metadata, "title").unwrap_or_else(|| item.name.clone());
        let author = metadata_str(&metadata, "author");
        let description = metadata_str(&metadata, "description");

        let mut tags = item.tags.clone();
        for tag in metadata_list(&metadata, "tags") {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        let path = item.path.clone().unwrap_or_else(|| item.name.clone());

        let searchable = SearchableFields {
            title: title.to_lowercase(),
            path: path.to_lowercase(),
            tags: tags.join(" ").to_lowercase(),
            description: description.as_deref().unwrap_or_default().to_lowercase(),
            author: author.as_deref().unwrap_or_default().to_lowercase(),
        };

        Self {
            id,
            name: item.name.clone(),
            path,
            kind: item.kind,
            title,
            content: body.to_lowercase(),
            tags,
            author,
            description,
            metadata,
            searchable,
        }
    }

    /// Lower-cased text of `field`, as matched by the query evaluator.
    ///
    /// Tags are joined with single spaces.
    pub fn field_text(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.searchable.title,
            Field::Content => &self.content,
            Field::Path => &self.searchable.path,
            Field::Tags => &self.searchable.tags,
            Field::Description => &self.searchable.description,
            Field::Author => &self.searchable.author,
        }
    }
}

/// Non-empty string value for `key`. Numbers and booleans are rendered as text.
fn metadata_str(metadata: &Metadata, key: &str) -> Option<String> {
    let text = match metadata.get(key)? {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// String list for `key`; a bare string counts as a one-element list.
fn metadata_list(metadata: &Metadata, key: &str) -> Vec<String> {
    match metadata.get(key) {
        Some(serde_json::Value::Array(values)) => values
            .iter()
            .filter_map(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(serde_json::Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
