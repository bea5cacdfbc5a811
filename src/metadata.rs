//! Front-matter metadata: a leading `---` delimited block of `key: value` lines.
//!
//! Values are typed loosely, the way documentation authors write them:
//! `[a, b]` lists, numbers, `true`/`false`, and strings with optional quotes.

use crate::error::MetadataError;
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

/// Parsed key/value metadata, retained for display.
pub type Metadata = serde_json::Map<String, Value>;

static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---\r?\n((?s:.*?))\r?\n---(?:\r?\n|\z)").expect("front matter pattern is valid")
});

/// Result of splitting a markdown document into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter<'a> {
    /// Parsed metadata; empty when there was no block or it was malformed.
    pub metadata: Metadata,
    /// Document text after the metadata block.
    pub body: &'a str,
    /// Set when a block was present but could not be parsed.
    pub error: Option<MetadataError>,
}

/// Split `markdown` into its front-matter metadata and body.
///
/// A malformed block still gets stripped from the body; only its metadata is dropped.
pub fn parse_front_matter(markdown: &str) -> FrontMatter<'_> {
    let Some(captures) = FRONT_MATTER.captures(markdown) else {
        return FrontMatter {
            metadata: Metadata::new(),
            body: markdown,
            error: None,
        };
    };

    let block_end = captures.get(0).map_or(0, |m| m.end());
    let block = captures.get(1).map_or("", |m| m.as_str());
    let body = &markdown[block_end..];

    match parse_block(block) {
        Ok(metadata) => FrontMatter {
            metadata,
            body,
            error: None,
        },
        Err(error) => FrontMatter {
            metadata: Metadata::new(),
            body,
            error: Some(error),
        },
    }
}

/// Parse the lines of a metadata block.
///
/// Blank lines, `#` comments and lines without a colon are skipped.
pub fn parse_block(block: &str) -> Result<Metadata, MetadataError> {
    let mut metadata = Metadata::new();

    for (index, line) in block.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(MetadataError::EmptyKey { line: index + 1 });
        }

        let value = parse_value(key, value.trim())?;
        metadata.insert(key.to_string(), value);
    }

    Ok(metadata)
}

fn parse_value(key: &str, raw: &str) -> Result<Value, MetadataError> {
    let value = strip_quotes(raw);

    if let Some(list) = value.strip_prefix('[') {
        let Some(list) = list.strip_suffix(']') else {
            return Err(MetadataError::UnterminatedList {
                key: key.to_string(),
            });
        };
        let items = list
            .split(',')
            .map(|item| item.trim().replace(['\'', '"'], ""))
            .filter(|item| !item.is_empty())
            .map(Value::String)
            .collect();
        return Ok(Value::Array(items));
    }

    if let Ok(int) = value.parse::<i64>() {
        return Ok(Value::Number(int.into()));
    }
    // `inf` and `NaN` parse as floats but are words here.
    if !value.chars().any(char::is_alphabetic)
        && let Some(number) = value.parse::<f64>().ok().and_then(Number::from_f64)
    {
        return Ok(Value::Number(number));
    }

    if value.eq_ignore_ascii_case("true") {
        return Ok(Value::Bool(true));
    }
    if value.eq_ignore_ascii_case("false") {
        return Ok(Value::Bool(false));
    }

    Ok(Value::String(value.to_string()))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Reading time in minutes, taken from a positive `minute` entry.
pub fn reading_time(metadata: &Metadata) -> Option<f64> {
    metadata
        .get("minute")
        .and_then(Value::as_f64)
        .filter(|minutes| *minutes > 0.0)
}

/// Render a reading time for display, e.g. `"5 min read"`.
pub fn format_reading_time(minutes: Option<f64>) -> Option<String> {
    minutes
        .filter(|m| *m > 0.0)
        .map(|m| format!("{} min read", m))
}
