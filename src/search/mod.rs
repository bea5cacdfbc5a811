//! Query-language search over indexed documentation content.
//!
//! This module provides the query tokenizer and recursive-descent parser, the
//! structural evaluator with weighted multi-field scoring, highlight extraction,
//! and result ranking with a plain substring fallback.

// Module declarations
pub(crate) mod evaluate;
pub(crate) mod highlight;
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod rank;
pub(crate) mod scoring;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use evaluate::{Evaluation, Evaluator};
pub use highlight::{Highlight, Highlighter};
pub use index::SearchIndex;
pub use query::{BooleanOp, MAX_QUERY_DEPTH, Parser, Query};
pub use rank::{ResultGroup, SearchResult, group_by_kind};
pub use scoring::{count_occurrences, edit_distance, wildcard_regex};
pub use tokenize::{FieldValue, Token, tokenize};
