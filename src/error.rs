//! Error handling types and utilities.

/// A specialized Result type for docsift operations that touch the outside world
/// (filesystem content sources, configuration files).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a query string cannot be turned into a query tree.
///
/// Never surfaced by [`SearchIndex::search`](crate::SearchIndex::search): the search
/// entry point recovers from it by running the simple substring search instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuerySyntaxError {
    /// A `"` opened a phrase that was never closed.
    #[error("unterminated phrase starting at byte {position}")]
    UnterminatedPhrase { position: usize },
    /// A `(` without its `)`.
    #[error("missing closing parenthesis for group opened at token {position}")]
    UnmatchedParen { position: usize },
    /// A term was expected but the token stream ran out.
    #[error("unexpected end of query")]
    UnexpectedEnd,
    /// A token that cannot start a term (for example a stray `)`).
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },
    /// Groups, negations or chained operators nest deeper than the parser allows.
    #[error("query nests too deeply at token {position}")]
    TooDeep { position: usize },
}

/// Error returned when a front-matter metadata block is malformed.
///
/// Recovered per document: the document is indexed with empty metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// A `key: value` line whose key is empty.
    #[error("metadata line {line} has an empty key")]
    EmptyKey { line: usize },
    /// A value opened a `[...]` list without closing it.
    #[error("list value for '{key}' is missing its closing bracket")]
    UnterminatedList { key: String },
}
