//! In-memory search over documentation content with a compact query language.
//!
//! ```
//! use docsift::{ContentItem, SearchIndex};
//!
//! let index = SearchIndex::build(&[
//!     ContentItem::new("hooks/guide").with_tags(["hooks", "react"]),
//!     ContentItem::new("vue/basics").with_tags(["vue"]),
//! ]);
//!
//! let results = index.search("react NOT vue");
//! assert_eq!(results[0].name, "hooks/guide");
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod metadata;
pub mod search;
pub mod source;
pub mod tracing;

pub use config::{FieldWeights, HighlightConfig, SearchConfig};
pub use document::{ContentItem, DocKind, Field, IndexedDocument};
pub use error::{MetadataError, QuerySyntaxError};
pub use history::SearchHistory;
pub use search::{Highlight, Query, SearchIndex, SearchResult, group_by_kind};
